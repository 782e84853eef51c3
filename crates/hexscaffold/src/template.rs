//! Template loading and `<key>` placeholder substitution.
//!
//! Bodies are looked up by name through a [`TemplateRegistry`] and read from
//! a [`TemplateSource`]. Substitution is a single left-to-right scan: values
//! are never rescanned, and placeholders with no binding stay verbatim.

use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::{Path, PathBuf};

use crate::builtin;
use crate::registry::TemplateRegistry;
use crate::types::{ScaffoldError, ScaffoldResult};

/// Key → value pairs substituted into one template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    values: BTreeMap<String, String>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Builder form of [`Bindings::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Where template bodies come from.
pub trait TemplateSource {
    /// Read the body stored at `relative` (e.g. `domain/domain-model.template`).
    ///
    /// Must return an error of kind [`io::ErrorKind::NotFound`] when the
    /// source has no such body, so layered sources can fall through.
    fn read(&self, relative: &Path) -> io::Result<String>;

    /// Human-readable description for logs.
    fn describe(&self) -> String;
}

/// The default template set compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTemplates;

impl TemplateSource for BuiltinTemplates {
    fn read(&self, relative: &Path) -> io::Result<String> {
        let key = relative.to_string_lossy().replace('\\', "/");
        builtin::lookup(&key)
            .map(str::to_string)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no builtin {key}")))
    }

    fn describe(&self) -> String {
        "builtin".to_string()
    }
}

/// Template bodies read from a directory tree on disk.
#[derive(Debug, Clone)]
pub struct DirectoryTemplates {
    root: PathBuf,
}

impl DirectoryTemplates {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TemplateSource for DirectoryTemplates {
    fn read(&self, relative: &Path) -> io::Result<String> {
        std::fs::read_to_string(self.root.join(relative))
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// In-memory template bodies, keyed by relative path.
#[derive(Debug, Clone, Default)]
pub struct MemoryTemplates {
    bodies: HashMap<PathBuf, String>,
}

impl MemoryTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, relative: impl Into<PathBuf>, body: impl Into<String>) -> &mut Self {
        self.bodies.insert(relative.into(), body.into());
        self
    }

    /// Store `body` at the path the registry assigns to `name`.
    pub fn insert_named(
        &mut self,
        registry: &TemplateRegistry,
        name: &str,
        body: impl Into<String>,
    ) -> &mut Self {
        self.insert(registry.relative_path(name), body)
    }
}

impl TemplateSource for MemoryTemplates {
    fn read(&self, relative: &Path) -> io::Result<String> {
        self.bodies.get(relative).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no template at {}", relative.display()),
            )
        })
    }

    fn describe(&self) -> String {
        format!("memory ({} bodies)", self.bodies.len())
    }
}

/// Tries each source in order; the first that has the body wins.
#[derive(Default)]
pub struct LayeredTemplates {
    layers: Vec<Box<dyn TemplateSource>>,
}

impl LayeredTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, source: impl TemplateSource + 'static) -> Self {
        self.layers.push(Box::new(source));
        self
    }

    /// A template directory overriding the builtin set, or the builtin set alone.
    pub fn with_overrides(dir: Option<&Path>) -> Self {
        let layered = Self::new();
        let layered = match dir {
            Some(dir) => layered.push(DirectoryTemplates::new(dir)),
            None => layered,
        };
        layered.push(BuiltinTemplates)
    }
}

impl TemplateSource for LayeredTemplates {
    fn read(&self, relative: &Path) -> io::Result<String> {
        for layer in &self.layers {
            match layer.read(relative) {
                Ok(body) => return Ok(body),
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e),
            }
        }
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no layer has {}", relative.display()),
        ))
    }

    fn describe(&self) -> String {
        self.layers
            .iter()
            .map(|l| l.describe())
            .collect::<Vec<_>>()
            .join(" > ")
    }
}

/// Renders named templates from a source.
pub struct TemplateEngine<'a> {
    registry: &'a TemplateRegistry,
    source: &'a dyn TemplateSource,
}

impl<'a> TemplateEngine<'a> {
    pub fn new(registry: &'a TemplateRegistry, source: &'a dyn TemplateSource) -> Self {
        Self { registry, source }
    }

    pub fn registry(&self) -> &TemplateRegistry {
        self.registry
    }

    /// Load the raw body of `name`.
    pub fn load(&self, name: &str) -> ScaffoldResult<String> {
        let relative = self.registry.relative_path(name);
        self.source.read(&relative).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ScaffoldError::TemplateNotFound {
                    name: name.to_string(),
                    path: relative.clone(),
                }
            } else {
                ScaffoldError::TemplateIo {
                    name: name.to_string(),
                    source,
                }
            }
        })
    }

    /// Load `name` and substitute `bindings` into it.
    pub fn render(&self, name: &str, bindings: &Bindings) -> ScaffoldResult<String> {
        let body = self.load(name)?;
        tracing::trace!("rendering {} with {} binding(s)", name, bindings.len());
        Ok(substitute(&body, bindings))
    }
}

/// Replace every `<key>` with its bound value in one pass.
///
/// A `<` that does not open a bound key is copied through unchanged, so
/// Go generics, comparisons and HTML in templates survive.
pub fn substitute(body: &str, bindings: &Bindings) -> String {
    let mut out = String::with_capacity(body.len());
    let mut rest = body;

    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let bound = after
            .find('>')
            .map(|close| (&after[..close], close))
            .filter(|(key, _)| is_key(key))
            .and_then(|(key, close)| bindings.get(key).map(|value| (value, close)));

        match bound {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('<');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn is_key(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
