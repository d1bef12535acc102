//! Declaration-time builder for decorator classes.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::association::{
    AssociationBinding, AssociationOptions, AssociationPath, Target, inferred_decorator_name,
};
use crate::attributes::{AttributeRegistry, Method};
use crate::error::{DeclarationErrors, TintError, TintResult};
use crate::planner::EagerLoadPlanner;
use crate::schema::SchemaSpec;

use super::class::ClassInner;
use super::{Decorator, DecoratorClass, DecoratorRegistry};

/// Collects declarations for one decorator class.
///
/// Declaration methods never fail on their own. Rejected declarations are
/// recorded and reported together by [`DecoratorClassBuilder::build`].
///
/// # Examples
///
/// ```rust
/// use tint::{AssociationOptions, DecoratorClass, DecoratorRegistry};
///
/// let mut registry = DecoratorRegistry::new();
/// registry.define("AuthorDecorator", |class| class.attributes(["name"]))?;
/// let posts = DecoratorClass::builder("PostDecorator")
///     .with_registry(&registry)
///     .attributes(["title"])
///     .decorates_association("author", AssociationOptions::new())
///     .build()?;
/// assert!(posts.eager_loads().covers(["author"]));
/// # Ok::<_, tint::TintError>(())
/// ```
#[must_use]
pub struct DecoratorClassBuilder {
    name: String,
    registry: Option<DecoratorRegistry>,
    attributes: AttributeRegistry,
    planner: EagerLoadPlanner,
    associations: Vec<AssociationBinding>,
    errors: Vec<TintError>,
}

impl DecoratorClassBuilder {
    pub(super) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            registry: None,
            attributes: AttributeRegistry::new(),
            planner: EagerLoadPlanner::new(),
            associations: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Resolve association decorators by name through `registry`.
    pub fn with_registry(mut self, registry: &DecoratorRegistry) -> Self {
        self.registry = Some(registry.clone());
        self
    }

    /// Declare attributes read from same-named members.
    pub fn attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            if self.check_identifier(name.as_ref(), "attribute names") {
                self.attributes.declare_delegated(name.as_ref());
            }
        }
        self
    }

    /// Declare `output`, read from member `source`.
    pub fn mapped(mut self, output: &str, source: &str) -> Self {
        if self.check_identifier(output, "attribute names")
            && self.check_identifier(source, "mapped sources")
        {
            self.attributes.declare_mapped(output, source);
        }
        self
    }

    /// Declare several mapped attributes as `(output, source)` pairs.
    pub fn mappings<I, K, V>(self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        pairs
            .into_iter()
            .fold(self, |builder, (output, source)| {
                builder.mapped(output.as_ref(), source.as_ref())
            })
    }

    /// Declare attributes from their JSON form.
    ///
    /// Accepts a string, an object of `output: source` pairs, or an array
    /// mixing both, such as `["title", {"summary": "body"}]`.
    pub fn attributes_from_value(mut self, value: &Value) -> Self {
        match value {
            Value::String(name) => self.attributes([name]),
            Value::Object(pairs) => {
                for (output, source) in pairs {
                    self = match source {
                        Value::String(member) => self.mapped(output, member),
                        other => self.reject(format!(
                            "mapped source for '{output}' must be a string, found {other}"
                        )),
                    };
                }
                self
            }
            Value::Array(items) => items
                .iter()
                .fold(self, |builder, item| match item {
                    Value::Array(_) => builder.reject(format!(
                        "attribute lists cannot nest arrays, found {item}"
                    )),
                    other => builder.attributes_from_value(other),
                }),
            other => self.reject(format!("expected attribute declarations, found {other}")),
        }
    }

    /// Define a computed attribute named `name`.
    ///
    /// Declared attributes with the same name, earlier or later, resolve
    /// through `compute`. A name already taken by an association is rejected.
    pub fn computed<F>(mut self, name: &str, compute: F) -> Self
    where
        F: Fn(&Decorator) -> TintResult<Option<Value>> + Send + Sync + 'static,
    {
        if self.associations.iter().any(|b| b.alias() == name) {
            return self.reject(format!("'{name}' is already declared as an association"));
        }
        if self.check_identifier(name, "attribute names") {
            self.attributes
                .define_method(name, Method::Computed(Arc::new(compute)));
            self.attributes.declare_delegated(name);
        }
        self
    }

    /// Declare an association reached through the path `target`.
    ///
    /// The association is exposed under its alias (by default the final path
    /// segment), and the child class's eager-load tree is folded into this
    /// class's tree beneath that path.
    pub fn decorates_association(
        mut self,
        target: impl Into<AssociationPath>,
        mut options: AssociationOptions,
    ) -> Self {
        let path: AssociationPath = target.into();
        if path.segments().is_empty() {
            return self.reject("association paths need at least one segment");
        }
        if !path
            .segments()
            .iter()
            .all(|segment| self.check_identifier(segment, "association segments"))
        {
            return self;
        }
        let Some(alias) = options.alias().or_else(|| path.last()).map(str::to_owned) else {
            return self;
        };
        if !self.check_identifier(&alias, "association aliases") {
            return self;
        }
        if self.associations.iter().any(|b| b.alias() == alias) {
            return self.reject(format!("association '{alias}' is declared twice"));
        }
        if self.attributes.has_method(&alias) {
            return self.reject(format!(
                "association '{alias}' clashes with a computed attribute"
            ));
        }
        let target = match self.resolve_decorator(&path, &options) {
            Ok(target) => target,
            Err(err) => {
                self.errors.push(err);
                return self;
            }
        };

        let scope = options.take_scope();
        let context = options.take_context();
        let binding =
            AssociationBinding::new(path.into_segments(), alias.clone(), target, scope, context);
        self.planner.declare(SchemaSpec::Tree(binding.schema()));
        self.attributes
            .define_method(&alias, Method::Association(self.associations.len()));
        self.attributes.declare_delegated(&alias);
        self.associations.push(binding);
        self
    }

    /// Declare an association with options in their JSON form.
    pub fn decorates_association_value(
        self,
        path: impl Into<AssociationPath>,
        raw: Value,
    ) -> Self {
        match AssociationOptions::from_value(raw) {
            Ok(options) => self.decorates_association(path, options),
            Err(err) => self.reject(format!("invalid association options: {err}")),
        }
    }

    /// Declare one single-segment association per name, sharing `options`.
    pub fn decorates_associations<I, S>(self, names: I, options: &AssociationOptions) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().fold(self, |builder, name| {
            let segment: String = name.into();
            builder.decorates_association(segment, options.clone())
        })
    }

    /// Merge eager-load declarations into the class tree.
    pub fn eager_load<I, S>(mut self, specs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SchemaSpec>,
    {
        for declared in specs {
            let spec = declared.into();
            if spec
                .identifiers()
                .iter()
                .all(|name| self.check_identifier(name, "eager-load identifiers"))
            {
                self.planner.declare(spec);
            }
        }
        self
    }

    /// Merge eager-load declarations given in their JSON form.
    pub fn eager_load_value(self, value: &Value) -> Self {
        match SchemaSpec::parse_value(value) {
            Ok(specs) => self.eager_load(specs),
            Err(err) => self.reject(format!("invalid eager-load declaration: {err}")),
        }
    }

    /// Finish the class.
    ///
    /// # Errors
    ///
    /// Returns the single recorded declaration error, or
    /// [`TintError::Declarations`] when several were recorded.
    pub fn build(self) -> TintResult<DecoratorClass> {
        if let Some(err) = DeclarationErrors::collect(&self.name, self.errors) {
            return Err(err);
        }
        debug!(
            class = %self.name,
            attributes = self.attributes.len(),
            associations = self.associations.len(),
            "decorator class built"
        );
        Ok(DecoratorClass::from_inner(ClassInner {
            name: self.name,
            attributes: self.attributes,
            planner: self.planner,
            associations: self.associations,
        }))
    }

    fn resolve_decorator(
        &self,
        path: &AssociationPath,
        options: &AssociationOptions,
    ) -> TintResult<Target> {
        if options.self_decorated() {
            return Ok(Target::Declaring);
        }
        if let Some(class) = options.decorator() {
            return Ok(Target::Class(class.clone()));
        }
        let name = options.decorator_name().map_or_else(
            || path.last().map(inferred_decorator_name).unwrap_or_default(),
            str::to_owned,
        );
        self.registry
            .as_ref()
            .and_then(|registry| registry.get(&name))
            .map(|class| Target::Class(class.clone()))
            .ok_or(TintError::UnknownDecorator { name })
    }

    fn check_identifier(&mut self, name: &str, what: &str) -> bool {
        if name.trim().is_empty() {
            self.errors.push(TintError::invalid_declaration(
                self.name.clone(),
                format!("{what} must not be empty"),
            ));
            false
        } else {
            true
        }
    }

    fn reject(mut self, message: impl Into<String>) -> Self {
        self.errors
            .push(TintError::invalid_declaration(self.name.clone(), message));
        self
    }
}

impl fmt::Debug for DecoratorClassBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoratorClassBuilder")
            .field("name", &self.name)
            .field("attributes", &self.attributes)
            .field("eager_loads", self.planner.tree())
            .field("associations", &self.associations)
            .field("errors", &self.errors.len())
            .finish_non_exhaustive()
    }
}
