//! Class lookup on the canonical search paths
//!
//! Every `.java` and `.class` file beneath a search root is indexed by the
//! binary name its relative path spells (`a/b/C$D.class` is `a.b.C$D`). The
//! index is built on first use. Class files also contribute their kind and
//! supertypes, read from the class file header.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use walkdir::WalkDir;

use super::classes::{ClassInfo, ClassSource};
use crate::ast::ClassKind;
use crate::error::{Error, Result};

pub struct ClasspathSource {
    roots: Vec<PathBuf>,
    index: OnceCell<HashMap<String, PathBuf>>,
}

impl ClasspathSource {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            index: OnceCell::new(),
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn index(&self) -> &HashMap<String, PathBuf> {
        self.index.get_or_init(|| build_index(&self.roots))
    }

    /// File that defines a class, if any root has one
    pub fn path_of(&self, name: &str) -> Option<&Path> {
        self.index().get(name).map(PathBuf::as_path)
    }

    /// Binary names of every indexed class, sorted
    pub fn class_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.index().keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.index().len()
    }

    pub fn is_empty(&self) -> bool {
        self.index().is_empty()
    }
}

impl std::fmt::Debug for ClasspathSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClasspathSource")
            .field("roots", &self.roots)
            .field("indexed", &self.index.get().map(HashMap::len))
            .finish()
    }
}

impl ClassSource for ClasspathSource {
    fn label(&self) -> &str {
        "classpath"
    }

    fn find(&self, name: &str) -> Option<ClassInfo> {
        let path = self.path_of(name)?;
        if path.extension().map_or(true, |ext| ext != "class") {
            return Some(ClassInfo::new(name, ClassKind::Class));
        }

        match read_class_file(path) {
            Ok(header) => Some(header.into_info(name)),
            Err(err) => {
                log::warn!("{}", err);
                Some(ClassInfo::new(name, ClassKind::Class))
            }
        }
    }
}

fn build_index(roots: &[PathBuf]) -> HashMap<String, PathBuf> {
    let mut index = HashMap::new();

    for root in roots {
        if !root.is_dir() {
            log::warn!("search path entry {} is not a directory, skipping", root.display());
            continue;
        }

        for entry in WalkDir::new(root).follow_links(true).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if let Some(name) = binary_name_for(root, path) {
                // Earlier roots shadow later ones
                index.entry(name).or_insert_with(|| path.to_path_buf());
            }
        }
    }

    log::debug!("indexed {} classes under {} search roots", index.len(), roots.len());
    index
}

/// `root/a/b/C$D.class` -> `a.b.C$D`
fn binary_name_for(root: &Path, path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?;
    if ext != "java" && ext != "class" {
        return None;
    }

    let relative = path.strip_prefix(root).ok()?.with_extension("");
    let segments: Option<Vec<&str>> = relative
        .components()
        .map(|component| component.as_os_str().to_str())
        .collect();
    let segments = segments?;
    if segments.is_empty() || segments.iter().any(|s| s.is_empty() || s.contains('.')) {
        return None;
    }
    Some(segments.join("."))
}

const CLASS_MAGIC: u32 = 0xCAFE_BABE;
const ACC_INTERFACE: u16 = 0x0200;

/// Kind and supertypes read from a class file
#[derive(Debug, Clone, PartialEq, Eq)]
struct ClassHeader {
    is_interface: bool,
    this_class: String,
    superclass: Option<String>,
    interfaces: Vec<String>,
}

impl ClassHeader {
    fn into_info(self, name: &str) -> ClassInfo {
        if self.this_class != name {
            log::warn!("class file for {} declares {}", name, self.this_class);
        }
        let kind = if self.is_interface { ClassKind::Interface } else { ClassKind::Class };
        let mut info = ClassInfo::new(name, kind).with_interfaces(self.interfaces);
        // Interfaces record java.lang.Object as their superclass
        info.superclass = if self.is_interface { None } else { self.superclass };
        info
    }
}

fn read_class_file(path: &Path) -> Result<ClassHeader> {
    let bytes = fs::read(path)?;
    parse_class_header(&bytes).map_err(|message| Error::ClassFormat {
        path: path.to_path_buf(),
        message,
    })
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> std::result::Result<&'a [u8], String> {
        let end = self.pos + n;
        let slice = self
            .bytes
            .get(self.pos..end)
            .ok_or_else(|| format!("truncated at byte {}", self.pos))?;
        self.pos = end;
        Ok(slice)
    }

    fn u1(&mut self) -> std::result::Result<u8, String> {
        Ok(self.take(1)?[0])
    }

    fn u2(&mut self) -> std::result::Result<u16, String> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u4(&mut self) -> std::result::Result<u32, String> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }
}

enum PoolEntry {
    Utf8(String),
    Class(u16),
    Other,
}

fn parse_class_header(bytes: &[u8]) -> std::result::Result<ClassHeader, String> {
    let mut r = Reader { bytes, pos: 0 };
    if r.u4()? != CLASS_MAGIC {
        return Err("bad magic number".to_string());
    }
    r.take(4)?; // minor and major version

    let count = r.u2()? as usize;
    let mut pool: Vec<PoolEntry> = Vec::with_capacity(count);
    pool.push(PoolEntry::Other);
    while pool.len() < count {
        let tag = r.u1()?;
        let entry = match tag {
            1 => {
                let len = r.u2()? as usize;
                PoolEntry::Utf8(String::from_utf8_lossy(r.take(len)?).into_owned())
            }
            7 => PoolEntry::Class(r.u2()?),
            3 | 4 => {
                r.take(4)?;
                PoolEntry::Other
            }
            5 | 6 => {
                r.take(8)?;
                // Long and double constants occupy two slots
                pool.push(PoolEntry::Other);
                PoolEntry::Other
            }
            8 | 16 | 19 | 20 => {
                r.take(2)?;
                PoolEntry::Other
            }
            9 | 10 | 11 | 12 | 17 | 18 => {
                r.take(4)?;
                PoolEntry::Other
            }
            15 => {
                r.take(3)?;
                PoolEntry::Other
            }
            other => return Err(format!("unknown constant pool tag {}", other)),
        };
        pool.push(entry);
    }

    let class_name = |index: u16| -> std::result::Result<String, String> {
        let name_index = match pool.get(index as usize) {
            Some(PoolEntry::Class(name_index)) => *name_index,
            _ => return Err(format!("constant #{} is not a class", index)),
        };
        match pool.get(name_index as usize) {
            Some(PoolEntry::Utf8(name)) => Ok(name.replace('/', ".")),
            _ => Err(format!("constant #{} is not a UTF-8 entry", name_index)),
        }
    };

    let access = r.u2()?;
    let this_class = class_name(r.u2()?)?;
    let super_index = r.u2()?;
    let superclass = if super_index == 0 { None } else { Some(class_name(super_index)?) };
    let interface_count = r.u2()?;
    let mut interfaces = Vec::with_capacity(interface_count as usize);
    for _ in 0..interface_count {
        interfaces.push(class_name(r.u2()?)?);
    }

    Ok(ClassHeader {
        is_interface: access & ACC_INTERFACE != 0,
        this_class,
        superclass,
        interfaces,
    })
}
