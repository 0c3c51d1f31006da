//! The language context: the process-wide registry of definitions.
//!
//! Holds every loaded definition, the active plugin runners, and the parser
//! cache. Construction bootstraps the embedded core spec, so a fresh
//! context already knows what a `schema` is. Definitions reference each
//! other by name, never by pointer; lookups are linear scans over the
//! definition list.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use uuid::Uuid;

use crate::execute::{ConstraintCallback, PluginRunner};
use crate::parser::{self, ParserCache};

use super::core_spec;
use super::definition::Definition;
use super::definition_parser;
use super::error::{ContextError, LanguageError};
use super::extensions;
use super::inheritance;
use super::schema;

#[derive(Debug)]
pub struct LanguageContext {
    definitions: Vec<Definition>,
    plugin_runners: IndexMap<String, PluginRunner>,
    cache: ParserCache,
    /// `(extension uid, target name)` pairs currently applied.
    applied_extensions: FxHashSet<(Uuid, SmolStr)>,
    /// When set, removing an extension fails if other definitions still
    /// reference content it added.
    pub strict_extension_removal: bool,
}

impl LanguageContext {
    /// A fresh context with the core spec loaded and the runtime
    /// constraint plugin registered.
    pub fn new() -> Result<Self, ContextError> {
        let mut context = Self {
            definitions: Vec::new(),
            plugin_runners: IndexMap::new(),
            cache: ParserCache::new(),
            applied_extensions: FxHashSet::default(),
            strict_extension_removal: false,
        };
        let core = core_spec::parse(&mut context.cache)?;
        context.add_definitions(core)?;
        crate::validate::constraints::register_runtime_plugin(&mut context)?;
        Ok(context)
    }

    pub fn definitions(&self) -> &[Definition] {
        &self.definitions
    }

    /// Parse a file path or YAML text with the context's cache and load
    /// the resulting definitions.
    pub fn parse_and_load(&mut self, source: &str) -> Result<(), ContextError> {
        let definitions = parser::parse(&mut self.cache, source)?;
        self.add_definitions(definitions)
    }

    /// Add one definition and load it (inheritance, extensions, instance).
    pub fn add_definition(&mut self, definition: Definition) -> Result<(), ContextError> {
        let index = self.insert(definition)?;
        self.instantiate_at(vec![index])
    }

    /// Add a batch, non-extensions first so extension targets exist.
    pub fn add_definitions(&mut self, definitions: Vec<Definition>) -> Result<(), ContextError> {
        let (extensions, plain): (Vec<_>, Vec<_>) =
            definitions.into_iter().partition(Definition::is_extension);
        let mut indices = Vec::new();
        for definition in plain.into_iter().chain(extensions) {
            indices.push(self.insert(definition)?);
        }
        self.instantiate_at(indices)
    }

    /// Remove a definition, reversing its extension effects first.
    pub fn remove_definition(&mut self, definition: &Definition) -> Result<(), ContextError> {
        // The uid is name-derived, so same-name definitions with different
        // root keys share it; the root key disambiguates.
        let index = self
            .definitions
            .iter()
            .position(|candidate| {
                candidate.uid() == definition.uid()
                    && candidate.name == definition.name
                    && candidate.root_key() == definition.root_key()
            })
            .ok_or_else(|| ContextError::UnknownDefinition {
                name: definition.name.clone(),
            })?;

        if self.definitions[index].is_extension() {
            self.reverse_extension_at(index)?;
        }
        let removed = self.definitions.remove(index);
        if !removed.is_extension()
            && !self
                .definitions
                .iter()
                .any(|candidate| candidate.name == removed.name)
        {
            // Waiting extensions must re-apply if the target ever returns.
            self.applied_extensions
                .retain(|(_, target)| *target != removed.name);
        }
        let still_referenced = self
            .definitions
            .iter()
            .any(|candidate| candidate.source.uri() == removed.source.uri());
        if !still_referenced {
            removed.source.set_loaded_in_context(false);
        }
        Ok(())
    }

    pub fn remove_definitions(&mut self, definitions: &[Definition]) -> Result<(), ContextError> {
        for definition in definitions {
            self.remove_definition(definition)?;
        }
        Ok(())
    }

    /// Look up a definition by name, stripping a trailing `[]` list
    /// indicator. Duplicates are logged and the first match returned;
    /// the uniqueness constraint reports them properly.
    pub fn get_definition_by_name(&self, name: &str) -> Option<&Definition> {
        let name = name.strip_suffix("[]").unwrap_or(name).trim();
        let matching: Vec<&Definition> = self
            .definitions
            .iter()
            .filter(|definition| definition.name == name)
            .collect();
        // Same-name definitions with distinct root keys are legal; only a
        // (name, root key) collision is worth shouting about.
        let colliding = matching.iter().enumerate().any(|(position, definition)| {
            matching[..position]
                .iter()
                .any(|earlier| earlier.root_key() == definition.root_key())
        });
        if colliding {
            tracing::error!(name, "multiple definitions share a name and root key; returning the first");
        }
        matching.first().copied()
    }

    pub fn get_definitions_by_root_key(&self, root_key: &str) -> Vec<&Definition> {
        self.definitions
            .iter()
            .filter(|definition| definition.root_key() == root_key)
            .collect()
    }

    /// Definitions whose governing schema has the given name.
    pub fn get_definitions_by_root(&self, type_name: &str) -> Vec<&Definition> {
        self.definitions
            .iter()
            .filter(|definition| {
                schema::definition_schema(self, definition)
                    .is_some_and(|governing| governing.name == type_name)
            })
            .collect()
    }

    pub fn get_root_keys(&self) -> Vec<String> {
        schema::root_keys(self)
    }

    pub fn get_primitive_types(&self) -> Vec<String> {
        self.get_definition_by_name(schema::PRIMITIVES_ENUM_NAME)
            .map(|primitives| primitives.values().iter().map(|v| v.to_string()).collect())
            .unwrap_or_default()
    }

    /// The names of every schema definition in the context.
    pub fn get_defined_types(&self) -> Vec<String> {
        self.get_definitions_by_root_key(schema::ROOT_KEY_SCHEMA)
            .into_iter()
            .map(|definition| definition.name.to_string())
            .collect()
    }

    pub fn is_primitive_type(&self, type_name: &str) -> bool {
        let base = schema::base_type(type_name);
        self.get_definition_by_name(schema::PRIMITIVES_ENUM_NAME)
            .is_some_and(|primitives| primitives.values().contains(&base))
    }

    pub fn is_definition_type(&self, type_name: &str) -> bool {
        let base = schema::base_type(type_name);
        self.definitions
            .iter()
            .any(|definition| {
                definition.root_key() == schema::ROOT_KEY_SCHEMA && definition.name == base
            })
    }

    /// Register a plugin, adding its declaring definition when absent.
    pub fn register_plugin_runner(&mut self, runner: PluginRunner) -> Result<(), ContextError> {
        if self
            .get_definition_by_name(runner.name())
            .is_none()
        {
            self.add_definition(runner.plugin_definition.clone())?;
        }
        self.plugin_runners.insert(runner.name().to_string(), runner);
        Ok(())
    }

    pub fn get_plugin_runners(&self) -> impl Iterator<Item = &PluginRunner> {
        self.plugin_runners.values()
    }

    /// Resolve a constraint name through every active runner.
    pub fn constraint_callback(&self, name: &str) -> Option<&ConstraintCallback> {
        self.plugin_runners
            .values()
            .find_map(|runner| runner.constraint_callback(name))
    }

    fn insert(&mut self, definition: Definition) -> Result<usize, ContextError> {
        if definition.is_extension() {
            return self.insert_extension(definition);
        }
        definition.source.set_loaded_in_context(true);
        self.definitions.push(definition);
        let index = self.definitions.len() - 1;
        self.apply_pending_extensions_to(index)?;
        Ok(index)
    }

    fn insert_extension(&mut self, extension: Definition) -> Result<usize, ContextError> {
        let Some(target_name) = extension.extension_target().map(SmolStr::from) else {
            return Err(ContextError::MissingExtensionTarget {
                name: extension.name.clone(),
            });
        };
        let Some(target_index) = self
            .definitions
            .iter()
            .position(|candidate| candidate.name == target_name)
        else {
            return Err(ContextError::UnknownExtensionTarget {
                name: extension.name.clone(),
                target: target_name,
            });
        };
        extension.source.set_loaded_in_context(true);
        self.definitions.push(extension);
        let index = self.definitions.len() - 1;
        let extension = self.definitions[index].clone();
        extensions::apply(&mut self.definitions[target_index], &extension)
            .map_err(|error| {
                self.definitions.pop();
                ContextError::Language(error)
            })?;
        self.applied_extensions
            .insert((extension.uid(), target_name));
        Ok(index)
    }

    /// Apply any already-present extension whose target just arrived.
    fn apply_pending_extensions_to(&mut self, target_index: usize) -> Result<(), ContextError> {
        let target_name = self.definitions[target_index].name.clone();
        let pending: Vec<Definition> = self
            .definitions
            .iter()
            .filter(|candidate| {
                candidate.is_extension()
                    && candidate.extension_target() == Some(target_name.as_str())
                    && !self
                        .applied_extensions
                        .contains(&(candidate.uid(), target_name.clone()))
            })
            .cloned()
            .collect();
        for extension in pending {
            extensions::apply(&mut self.definitions[target_index], &extension)
                .map_err(ContextError::Language)?;
            self.applied_extensions
                .insert((extension.uid(), target_name.clone()));
        }
        Ok(())
    }

    /// Instantiate the definitions at `indices`: apply inheritance, build
    /// the typed instance, and assign it. Failing definitions are removed
    /// from the context; the error of the earliest failure is returned.
    fn instantiate_at(&mut self, mut indices: Vec<usize>) -> Result<(), ContextError> {
        indices.sort_unstable();
        let mut first_error: Option<(usize, LanguageError)> = None;
        // Descending order so removals do not shift pending indices.
        for &index in indices.iter().rev() {
            if self.definitions[index].is_import() {
                continue;
            }
            let outcome = inheritance::collect(&*self, &self.definitions[index]);
            let parts = match outcome {
                Ok(parts) => parts,
                Err(error) => {
                    self.discard_failed(index, &error, &mut first_error);
                    continue;
                }
            };
            inheritance::apply(&mut self.definitions[index], parts);
            match definition_parser::build_instance(&*self, &self.definitions[index]) {
                Ok(instance) => self.definitions[index].instance = Some(instance),
                Err(error) => self.discard_failed(index, &error, &mut first_error),
            }
        }
        match first_error {
            Some((_, error)) => Err(ContextError::Language(error)),
            None => Ok(()),
        }
    }

    fn discard_failed(
        &mut self,
        index: usize,
        error: &LanguageError,
        first_error: &mut Option<(usize, LanguageError)>,
    ) {
        tracing::error!(
            definition = self.definitions[index].name.as_str(),
            error = %error,
            "definition failed to load and was rejected"
        );
        if self.definitions[index].is_extension() {
            // Applied before instantiation; take the effects back out.
            if self.reverse_extension_at(index).is_err() {
                tracing::warn!(
                    definition = self.definitions[index].name.as_str(),
                    "could not reverse extension while rejecting it"
                );
            }
        }
        self.definitions.remove(index);
        let keep = first_error
            .as_ref()
            .is_some_and(|(held, _)| *held <= index);
        if !keep {
            *first_error = Some((index, error.clone()));
        }
    }

    fn reverse_extension_at(&mut self, index: usize) -> Result<(), ContextError> {
        let extension = self.definitions[index].clone();
        let Some(target_name) = extension.extension_target().map(SmolStr::from) else {
            return Ok(());
        };
        if !self
            .applied_extensions
            .contains(&(extension.uid(), target_name.clone()))
        {
            return Ok(());
        }
        if self.strict_extension_removal {
            self.check_extension_unreferenced(&extension, &target_name)?;
        }
        if let Some(target_index) = self
            .definitions
            .iter()
            .position(|candidate| candidate.name == target_name)
        {
            extensions::remove(&mut self.definitions[target_index], &extension);
        }
        self.applied_extensions
            .remove(&(extension.uid(), target_name));
        Ok(())
    }

    /// Strict-removal policy: refuse to reverse an extension while any
    /// other definition still mentions a name it added. Conservative by
    /// intent; the flag defaults to off.
    fn check_extension_unreferenced(
        &self,
        extension: &Definition,
        target_name: &SmolStr,
    ) -> Result<(), ContextError> {
        let mut added = extensions::added_field_names(extension);
        added.extend(extensions::added_value_names(extension));
        for definition in &self.definitions {
            if definition.name == extension.name || definition.name == *target_name {
                continue;
            }
            for name in &added {
                if structure_mentions(&definition.structure, name) {
                    return Err(ContextError::ExtensionRemovalBlocked {
                        name: extension.name.clone(),
                        target: target_name.clone(),
                        referent: definition.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn structure_mentions(value: &serde_yaml::Value, needle: &str) -> bool {
    match value {
        serde_yaml::Value::String(text) => text == needle,
        serde_yaml::Value::Sequence(items) => {
            items.iter().any(|item| structure_mentions(item, needle))
        }
        serde_yaml::Value::Mapping(mapping) => mapping
            .iter()
            .any(|(_, child)| structure_mentions(child, needle)),
        _ => false,
    }
}
