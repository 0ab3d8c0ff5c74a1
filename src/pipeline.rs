//! Pipeline entry points
//!
//! A [`Pipeline`] owns everything that outlives a single compilation unit:
//! the registered rules and handlers, the registry of classes entered so
//! far and the resolution cache. Units are processed one at a time.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::ast::CompilationUnit;
use crate::codegen::CodeGenerator;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::resolve::{ClassCache, ClassRegistry, ImportTable, NameResolver};
use crate::summary::{Numbering, SummaryTree};
use crate::traverse::{complete_hierarchy, enter_classes, AssignmentHandler, HandlerRegistry, RegistrationId, Rule, Walker};

/// Turns source text into a tree
pub trait SourceParser {
    fn parse(&self, source: &str) -> Result<CompilationUnit>;
}

impl<F> SourceParser for F
where
    F: Fn(&str) -> Result<CompilationUnit>,
{
    fn parse(&self, source: &str) -> Result<CompilationUnit> {
        self(source)
    }
}

pub struct Pipeline {
    config: Config,
    handlers: HandlerRegistry,
    classes: Arc<ClassRegistry>,
    resolver: NameResolver,
    generator: CodeGenerator,
}

impl Pipeline {
    /// Pipeline with a cache of its own
    pub fn new(config: Config) -> Self {
        Self::with_cache(config, Arc::new(ClassCache::new()))
    }

    /// Pipeline sharing `cache`, e.g. [`ClassCache::global`]
    pub fn with_cache(config: Config, cache: Arc<ClassCache>) -> Self {
        let classes = Arc::new(ClassRegistry::new());
        let resolver = NameResolver::from_config(&config, classes.clone(), cache);
        let generator = CodeGenerator::new(&config);
        Self {
            config,
            handlers: HandlerRegistry::new(),
            classes,
            resolver,
            generator,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Classes entered from the units processed so far
    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    pub fn resolver(&self) -> &NameResolver {
        &self.resolver
    }

    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    pub fn handlers_mut(&mut self) -> &mut HandlerRegistry {
        &mut self.handlers
    }

    pub fn add_rule(&mut self, rule: impl Rule + 'static) -> RegistrationId {
        self.handlers.add_rule(Box::new(rule))
    }

    pub fn add_handler(&mut self, handler: impl AssignmentHandler + 'static) -> RegistrationId {
        self.handlers.add_handler(Box::new(handler))
    }

    /// Run rules, summary, class entry and the traversal over `unit`.
    ///
    /// The tree is rewritten in place. The returned numbering names every
    /// class of the unit, anonymous ones included.
    pub fn process(&mut self, unit: &mut CompilationUnit) -> Result<Numbering> {
        self.config.validate()?;
        log::debug!("processing unit in package '{}'", unit.package_name());

        self.handlers.run_before(unit)?;

        let tree = SummaryTree::build(unit);
        let numbering = tree.renumber();
        log::debug!("{} classes summarized, {} anonymous", tree.len(), numbering.anonymous().len());

        let imports = ImportTable::from_unit(unit, &self.config.implicit_package);
        enter_classes(&tree, &numbering, &self.classes)?;
        complete_hierarchy(&tree, &numbering, &self.resolver, &imports, &self.classes)?;

        let package = unit.package_name().to_string();
        Walker::new(&self.resolver, &mut self.handlers, &numbering, &imports, &package).traverse(unit)?;

        self.handlers.run_after(unit)?;
        Ok(numbering)
    }

    /// Process `unit` and generate its source
    pub fn transform_unit(&mut self, mut unit: CompilationUnit) -> Result<String> {
        self.process(&mut unit)?;
        Ok(self.generator.generate_to_string(&unit))
    }

    pub fn transform_text<P: SourceParser + ?Sized>(&mut self, parser: &P, source: &str) -> Result<String> {
        let unit = parser.parse(source)?;
        self.transform_unit(unit)
    }

    /// Like [`Pipeline::transform_text`]; every error names `path`
    pub fn transform_file<P: SourceParser + ?Sized>(&mut self, parser: &P, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        log::debug!("transforming {}", path.display());
        fs::read_to_string(path)
            .map_err(Error::from)
            .and_then(|source| self.transform_text(parser, &source))
            .map_err(|err| err.in_file(path))
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("handlers", &self.handlers)
            .field("classes", &self.classes.len())
            .finish()
    }
}

/// Transform one source text with no rules or handlers registered
pub fn transform_text<P: SourceParser + ?Sized>(parser: &P, source: &str, config: &Config) -> Result<String> {
    Pipeline::new(config.clone()).transform_text(parser, source)
}

/// Transform one file with no rules or handlers registered
pub fn transform_file<P: SourceParser + ?Sized>(parser: &P, path: impl AsRef<Path>, config: &Config) -> Result<String> {
    Pipeline::new(config.clone()).transform_file(parser, path)
}
