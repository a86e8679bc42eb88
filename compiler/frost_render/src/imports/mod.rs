//! Import alias assignment.
//!
//! Every qualified name in a rendered file goes through an [`ImportTable`],
//! which hands out one package alias per import path. Aliases are the last
//! path element reduced to a valid Go identifier; a clash with an alias
//! already handed out (or with a reserved name) gets a numeric suffix.
//! Names in the file's own package, and builtins, are written unqualified.

use rustc_hash::{FxHashMap, FxHashSet};

/// Go keywords and the predeclared names generated code may refer to.
const RESERVED: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var", "bool", "byte", "complex",
    "complex64", "complex128", "false", "float32", "float64", "int", "int8", "int16", "int32",
    "int64", "nil", "rune", "string", "true", "uint", "uint8", "uint16", "uint32", "uint64",
    "uintptr", "v",
];

/// One entry of the import block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Import<'a> {
    pub path: &'a str,
    pub alias: &'a str,
}

/// Import path to alias table for one file.
#[derive(Debug)]
pub struct ImportTable {
    own_path: String,
    aliases: FxHashMap<String, String>,
    taken: FxHashSet<String>,
}

impl ImportTable {
    /// A table for a file whose own package has import path `own_path`.
    pub fn new(own_path: impl Into<String>) -> Self {
        ImportTable {
            own_path: own_path.into(),
            aliases: FxHashMap::default(),
            taken: RESERVED.iter().map(|name| (*name).to_string()).collect(),
        }
    }

    /// Keep `name` from being used as an alias (top-level declarations).
    pub fn reserve(&mut self, name: &str) {
        self.taken.insert(name.to_string());
    }

    /// The qualifier for names from `path`, importing it on first use.
    ///
    /// `None` for builtins (empty path) and for the file's own package.
    pub fn qualifier(&mut self, path: &str) -> Option<&str> {
        if path.is_empty() || path == self.own_path {
            return None;
        }
        if !self.aliases.contains_key(path) {
            let alias = self.fresh_alias(path);
            self.taken.insert(alias.clone());
            self.aliases.insert(path.to_string(), alias);
        }
        self.aliases.get(path).map(String::as_str)
    }

    /// Imports sorted by path.
    pub fn imports(&self) -> Vec<Import<'_>> {
        let mut imports: Vec<_> = self
            .aliases
            .iter()
            .map(|(path, alias)| Import { path, alias })
            .collect();
        imports.sort_by(|a, b| a.path.cmp(b.path));
        imports
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    fn fresh_alias(&self, path: &str) -> String {
        let base = guess_alias(path);
        if !self.taken.contains(&base) {
            return base;
        }
        (1usize..)
            .map(|n| format!("{base}{n}"))
            .find(|candidate| !self.taken.contains(candidate))
            .unwrap_or(base)
    }
}

/// Package name guessed from an import path: `.../flux/ast` is `ast`,
/// `.../yaml/v2` is `yaml`, `.../go-cmp` is `cmp`.
pub fn guess_alias(path: &str) -> String {
    let mut elems = path.rsplit('/');
    let mut last = elems.next().unwrap_or_default();
    if is_major_version(last) {
        if let Some(prev) = elems.next() {
            last = prev;
        }
    }
    let last = last.strip_prefix("go-").unwrap_or(last);
    let last = last
        .strip_suffix("-go")
        .or_else(|| last.strip_suffix(".go"))
        .unwrap_or(last);

    let mut alias: String = last
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if alias.is_empty() || alias.starts_with(|c: char| c.is_ascii_digit()) {
        alias.insert_str(0, "pkg");
    }
    alias
}

fn is_major_version(elem: &str) -> bool {
    elem.strip_prefix('v')
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}
