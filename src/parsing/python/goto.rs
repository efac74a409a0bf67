//! Definition lookup at a cursor position
//!
//! Resolves the identifier under the cursor to the place it is bound and
//! names that place with a dotted path. Values are only followed far enough
//! to type the receiver of an attribute access (`session.get`, `"x".upper`);
//! there is no call-return or flow inference.

use super::builtins::{
    BUILTINS_MODULE, builtin_type, defining_builtin_type, is_builtin_name,
    is_implicit_module_attribute,
};
use super::modules::{ModuleFinder, ModuleLocation, resolve_relative_import};
use super::parser::ParsedSource;
use super::scope::{
    Binding, BindingKind, ImportTarget, Lookup, Receiver, class_chain, collect_bindings,
    enclosing_scopes, import_module_text, instance_attributes, lookup, method_receiver,
    parameter_name, qualified_name,
};
use super::summary::{MemberKind, ModuleIndex};
use crate::engine::Candidate;
use tree_sitter::Node;

/// Bound on value-following steps; cuts `x = x` style cycles
const MAX_DEPTH: usize = 16;

/// A class known well enough to look members up on
#[derive(Debug, Clone)]
enum ClassRef<'a> {
    /// `class_definition` in the analyzed file
    Local(Node<'a>),
    /// Class defined at the top level of an imported source module
    External {
        module: ModuleLocation,
        class: String,
    },
    Builtin(&'static str),
}

#[derive(Debug, Clone)]
enum Value<'a> {
    Module(ModuleLocation),
    Class(ClassRef<'a>),
    Instance(ClassRef<'a>),
}

/// An attribute found on a module
struct ModuleAttribute<'a> {
    candidate: Candidate,
    value: Option<Value<'a>>,
}

/// What an identifier inside an import statement denotes
#[derive(Debug, PartialEq, Eq)]
enum ImportRole {
    /// A (possibly relative) module path
    Module(String),
    /// `member` imported from `module`
    Member { module: String, member: String },
}

/// Goto resolution for one parsed file
pub struct Goto<'a> {
    source: &'a ParsedSource,
    module: &'a str,
    is_package: bool,
    finder: &'a ModuleFinder,
    index: &'a ModuleIndex,
}

impl<'a> Goto<'a> {
    pub fn new(
        source: &'a ParsedSource,
        module: &'a str,
        is_package: bool,
        finder: &'a ModuleFinder,
        index: &'a ModuleIndex,
    ) -> Self {
        Self {
            source,
            module,
            is_package,
            finder,
            index,
        }
    }

    /// Definitions of the identifier at byte `offset`
    pub fn definitions(&self, offset: usize) -> Vec<Candidate> {
        let Some(ident) = identifier_at(self.source.root(), offset) else {
            return Vec::new();
        };
        tracing::trace!(
            "identifier '{}' under cursor, parent {:?}",
            self.source.text(ident),
            ident.parent().map(|p| p.kind())
        );
        self.resolve_identifier(ident).into_iter().collect()
    }

    fn resolve_identifier(&self, ident: Node<'a>) -> Option<Candidate> {
        let name = self.source.text(ident);
        let parent = ident.parent()?;

        match parent.kind() {
            "attribute" if is_field(parent, "attribute", ident) => {
                let object = parent.child_by_field_name("object")?;
                let receiver = self.evaluate(object, 0)?;
                return self.member(&receiver, name);
            }
            "function_definition" | "class_definition" if is_field(parent, "name", ident) => {
                let chain = enclosing_scopes(parent);
                let full_name = qualified_name(self.source, self.module, name, &chain);
                return Some(Candidate::new(name, full_name));
            }
            "keyword_argument" if is_field(parent, "name", ident) => return None,
            _ => {}
        }

        if let Some(role) = self.import_role(ident) {
            return self.resolve_import(role);
        }

        if is_parameter(ident) {
            return Some(Candidate::new(name, None));
        }

        self.resolve_name(ident, name)
    }

    /// A bare name: LEGB scopes, star imports, builtins, then implicit
    /// module attributes
    fn resolve_name(&self, ident: Node<'a>, name: &str) -> Option<Candidate> {
        match lookup(self.source, name, ident) {
            Lookup::Bound { binding, chain } => match &binding.kind {
                BindingKind::Import(target) => self.resolve_import_binding(&binding, target),
                _ => {
                    let full_name = qualified_name(self.source, self.module, name, &chain);
                    Some(Candidate::new(name, full_name))
                }
            },
            Lookup::Unbound { star_imports } => {
                if let Some(candidate) = self.star_imported(&star_imports, name) {
                    return Some(candidate);
                }
                if is_implicit_module_attribute(name) {
                    return Some(Candidate::builtin(name, None));
                }
                if is_builtin_name(name) {
                    return Some(Candidate::builtin(
                        name,
                        Some(format!("{BUILTINS_MODULE}.{name}")),
                    ));
                }
                None
            }
        }
    }

    /// Usage of a name an `import` statement bound
    fn resolve_import_binding(
        &self,
        binding: &Binding<'a>,
        target: &ImportTarget,
    ) -> Option<Candidate> {
        let module = self.absolute(&target.module)?;
        let location = self.finder.find(&module)?;
        match &target.member {
            None => Some(Candidate::new(binding.name, Some(module))),
            Some(member) => {
                let attribute = self.module_attribute(&location, member, 0)?;
                Some(Candidate {
                    name: Some(binding.name.to_string()),
                    ..attribute.candidate
                })
            }
        }
    }

    fn star_imported(&self, star_imports: &[String], name: &str) -> Option<Candidate> {
        star_imports.iter().find_map(|module| {
            let module = self.absolute(module)?;
            let location = self.finder.find(&module)?;
            let summary = self.index.summary(&location)?;
            summary
                .member(name)
                .map(|_| Candidate::new(name, Some(format!("{module}.{name}"))))
        })
    }

    fn absolute(&self, module: &str) -> Option<String> {
        resolve_relative_import(module, self.module, self.is_package)
    }

    /// Role of an identifier that sits inside an import statement
    fn import_role(&self, ident: Node<'a>) -> Option<ImportRole> {
        let parent = ident.parent()?;
        match parent.kind() {
            "dotted_name" => {
                let mut parts = Vec::new();
                let mut cursor = parent.walk();
                for part in parent.named_children(&mut cursor) {
                    parts.push(self.source.text(part));
                    if part.id() == ident.id() {
                        break;
                    }
                }
                let prefix = parts.join(".");

                let container = parent.parent()?;
                match container.kind() {
                    "import_statement" => Some(ImportRole::Module(prefix)),
                    "relative_import" => {
                        let dots = container
                            .named_child(0)
                            .filter(|prefix| prefix.kind() == "import_prefix")
                            .map(|prefix| self.source.text(prefix))
                            .unwrap_or_default();
                        Some(ImportRole::Module(format!("{dots}{prefix}")))
                    }
                    "import_from_statement" if is_field(container, "module_name", parent) => {
                        Some(ImportRole::Module(prefix))
                    }
                    "import_from_statement" => Some(ImportRole::Member {
                        module: self.from_module(container)?,
                        member: prefix,
                    }),
                    "aliased_import" => self.aliased_role(container, prefix),
                    _ => None,
                }
            }
            "aliased_import" if is_field(parent, "alias", ident) => {
                let name = parent.child_by_field_name("name")?;
                self.aliased_role(parent, self.source.text(name).to_string())
            }
            _ => None,
        }
    }

    fn aliased_role(&self, aliased: Node<'a>, name: String) -> Option<ImportRole> {
        let statement = aliased.parent()?;
        match statement.kind() {
            "import_statement" => Some(ImportRole::Module(name)),
            "import_from_statement" => Some(ImportRole::Member {
                module: self.from_module(statement)?,
                member: name,
            }),
            _ => None,
        }
    }

    fn from_module(&self, statement: Node<'a>) -> Option<String> {
        let module = statement.child_by_field_name("module_name")?;
        Some(import_module_text(self.source, module))
    }

    fn resolve_import(&self, role: ImportRole) -> Option<Candidate> {
        match role {
            ImportRole::Module(path) => {
                let module = self.absolute(&path)?;
                self.finder.find(&module)?;
                let short = module.rsplit('.').next().unwrap_or(&module).to_string();
                Some(Candidate::new(short, Some(module)))
            }
            ImportRole::Member { module, member } => {
                let module = self.absolute(&module)?;
                let location = self.finder.find(&module)?;
                self.module_attribute(&location, &member, 0)
                    .map(|attribute| attribute.candidate)
            }
        }
    }

    /// Attribute `attr` of a module: a top-level name of a source module, a
    /// submodule, or anything at all on compiled and open modules.
    fn module_attribute(
        &self,
        module: &ModuleLocation,
        attr: &str,
        depth: usize,
    ) -> Option<ModuleAttribute<'a>> {
        let full_name = Some(format!("{}.{attr}", module.name));
        let found = |value| {
            Some(ModuleAttribute {
                candidate: Candidate::new(attr, full_name.clone()),
                value,
            })
        };

        if is_implicit_module_attribute(attr) {
            return Some(ModuleAttribute {
                candidate: Candidate::builtin(attr, None),
                value: None,
            });
        }

        let summary = self.index.summary(module);
        if let Some(summary) = &summary {
            match summary.member(attr) {
                Some(MemberKind::Class) => {
                    return found(Some(Value::Class(ClassRef::External {
                        module: module.clone(),
                        class: attr.to_string(),
                    })));
                }
                Some(MemberKind::Import(target)) => {
                    return found(self.import_value(target, depth + 1));
                }
                Some(MemberKind::Function | MemberKind::Variable) => return found(None),
                None => {}
            }
        }

        if let Some(submodule) = self.finder.find(&format!("{}.{attr}", module.name)) {
            return found(Some(Value::Module(submodule)));
        }

        let open = module.is_compiled() || summary.is_some_and(|s| s.is_open());
        if open { found(None) } else { None }
    }

    /// Value of an absolute import target from another module
    fn import_value(&self, target: &ImportTarget, depth: usize) -> Option<Value<'a>> {
        if depth > MAX_DEPTH {
            return None;
        }
        let location = self.finder.find(&target.module)?;
        match &target.member {
            None => Some(Value::Module(location)),
            Some(member) => self.module_attribute(&location, member, depth)?.value,
        }
    }

    /// Type an expression well enough to look attributes up on it
    fn evaluate(&self, expr: Node<'a>, depth: usize) -> Option<Value<'a>> {
        if depth > MAX_DEPTH {
            return None;
        }
        let next = depth + 1;

        match expr.kind() {
            "identifier" => {
                let name = self.source.text(expr);
                match lookup(self.source, name, expr) {
                    Lookup::Bound { binding, .. } => self.binding_value(&binding, next),
                    Lookup::Unbound { star_imports } => {
                        for module in &star_imports {
                            let Some(location) =
                                self.absolute(module).and_then(|m| self.finder.find(&m))
                            else {
                                continue;
                            };
                            let Some(summary) = self.index.summary(&location) else {
                                continue;
                            };
                            if summary.member(name).is_some() {
                                return self.module_attribute(&location, name, next)?.value;
                            }
                        }
                        builtin_type(name).map(|t| Value::Class(ClassRef::Builtin(t)))
                    }
                }
            }
            "attribute" => {
                let object = expr.child_by_field_name("object")?;
                let attr = self.source.text(expr.child_by_field_name("attribute")?);
                match self.evaluate(object, next)? {
                    Value::Module(module) => self.module_attribute(&module, attr, next)?.value,
                    Value::Class(ClassRef::Local(class)) => {
                        self.local_member_value(class, attr, false, next)
                    }
                    Value::Instance(ClassRef::Local(class)) => {
                        self.local_member_value(class, attr, true, next)
                    }
                    _ => None,
                }
            }
            "call" => match self.evaluate(expr.child_by_field_name("function")?, next)? {
                Value::Class(class) => Some(Value::Instance(class)),
                _ => None,
            },
            "string" | "concatenated_string" => {
                let text = self.source.text(expr);
                let prefix: String = text
                    .chars()
                    .take_while(|c| c.is_ascii_alphabetic())
                    .collect();
                let kind = if prefix.contains(['b', 'B']) {
                    "bytes"
                } else {
                    "str"
                };
                Some(builtin_instance(kind))
            }
            "integer" | "float" => {
                let text = self.source.text(expr);
                let kind = if text.ends_with(['j', 'J']) {
                    "complex"
                } else if expr.kind() == "integer" {
                    "int"
                } else {
                    "float"
                };
                Some(builtin_instance(kind))
            }
            "true" | "false" => Some(builtin_instance("bool")),
            "list" | "list_comprehension" => Some(builtin_instance("list")),
            "dictionary" | "dictionary_comprehension" => Some(builtin_instance("dict")),
            "set" | "set_comprehension" => Some(builtin_instance("set")),
            "tuple" => Some(builtin_instance("tuple")),
            "parenthesized_expression" => self.evaluate(expr.named_child(0)?, next),
            "assignment" => self.evaluate(expr.child_by_field_name("right")?, next),
            "named_expression" => self.evaluate(expr.child_by_field_name("value")?, next),
            _ => None,
        }
    }

    fn binding_value(&self, binding: &Binding<'a>, depth: usize) -> Option<Value<'a>> {
        if depth > MAX_DEPTH {
            return None;
        }
        match &binding.kind {
            BindingKind::Class => binding
                .definition()
                .map(|class| Value::Class(ClassRef::Local(class))),
            BindingKind::Variable => self.evaluate(binding.value?, depth + 1),
            BindingKind::Import(target) => {
                let target = ImportTarget {
                    module: self.absolute(&target.module)?,
                    member: target.member.clone(),
                };
                self.import_value(&target, depth + 1)
            }
            BindingKind::Parameter => {
                let (class, receiver) = method_receiver(self.source, binding.node)?;
                Some(match receiver {
                    Receiver::Instance => Value::Instance(ClassRef::Local(class)),
                    Receiver::Class => Value::Class(ClassRef::Local(class)),
                })
            }
            BindingKind::Function => None,
        }
    }

    /// First binding of `attr` in a local class body (or its `self.x`
    /// attributes for instances)
    fn local_member(&self, class: Node<'a>, attr: &str, instance: bool) -> Option<Binding<'a>> {
        let chain = class_chain(class);
        let bindings = collect_bindings(self.source, chain[0]);
        if let Some(binding) = bindings.bindings.into_iter().find(|b| b.name == attr) {
            return Some(binding);
        }
        if instance {
            return instance_attributes(self.source, class)
                .into_iter()
                .find(|b| b.name == attr);
        }
        None
    }

    fn local_member_value(
        &self,
        class: Node<'a>,
        attr: &str,
        instance: bool,
        depth: usize,
    ) -> Option<Value<'a>> {
        let binding = self.local_member(class, attr, instance)?;
        self.binding_value(&binding, depth)
    }

    /// Candidate for `receiver.attr`
    fn member(&self, receiver: &Value<'a>, attr: &str) -> Option<Candidate> {
        let found = match receiver {
            Value::Module(module) => self
                .module_attribute(module, attr, 0)
                .map(|attribute| attribute.candidate),
            Value::Class(class) => self.class_member(class, attr, false, 0),
            Value::Instance(class) => self.class_member(class, attr, true, 0),
        };
        found.or_else(|| is_dunder(attr).then(|| Candidate::new(attr, None)))
    }

    /// Look `attr` up along a class and its bases, ending at `object`
    fn class_member(
        &self,
        class: &ClassRef<'a>,
        attr: &str,
        instance: bool,
        depth: usize,
    ) -> Option<Candidate> {
        if depth > MAX_DEPTH {
            return None;
        }

        match class {
            ClassRef::Builtin(type_name) => {
                let owner = defining_builtin_type(*type_name, attr)?;
                Some(Candidate::builtin(
                    attr,
                    Some(format!("{BUILTINS_MODULE}.{owner}.{attr}")),
                ))
            }
            ClassRef::Local(node) => {
                if self.local_member(*node, attr, instance).is_some() {
                    let chain = class_chain(*node);
                    let full_name = qualified_name(self.source, self.module, attr, &chain);
                    return Some(Candidate::new(attr, full_name));
                }
                self.local_bases(*node, depth)
                    .iter()
                    .find_map(|base| self.class_member(base, attr, instance, depth + 1))
                    .or_else(|| self.object_member(attr))
            }
            ClassRef::External { module, class } => {
                let summary = self.index.summary(module)?;
                let class_summary = summary.class(class)?;
                if class_summary.members.contains(attr) {
                    return Some(Candidate::new(
                        attr,
                        Some(format!("{}.{class}.{attr}", module.name)),
                    ));
                }
                class_summary
                    .bases
                    .iter()
                    .filter_map(|base| self.external_base(module, base, depth))
                    .find_map(|base| self.class_member(&base, attr, instance, depth + 1))
                    .or_else(|| self.object_member(attr))
            }
        }
    }

    fn object_member(&self, attr: &str) -> Option<Candidate> {
        self.class_member(&ClassRef::Builtin("object"), attr, false, 0)
    }

    fn local_bases(&self, class: Node<'a>, depth: usize) -> Vec<ClassRef<'a>> {
        let Some(superclasses) = class.child_by_field_name("superclasses") else {
            return Vec::new();
        };
        let mut bases = Vec::new();
        let mut cursor = superclasses.walk();
        for base in superclasses.named_children(&mut cursor) {
            if !matches!(base.kind(), "identifier" | "attribute") {
                continue;
            }
            if let Some(Value::Class(class)) = self.evaluate(base, depth + 1) {
                bases.push(class);
            }
        }
        bases
    }

    /// Resolve a base class name written in an imported module
    fn external_base(
        &self,
        module: &ModuleLocation,
        base: &str,
        depth: usize,
    ) -> Option<ClassRef<'a>> {
        if base.contains('.') {
            return None;
        }
        let summary = self.index.summary(module)?;
        match summary.member(base) {
            Some(MemberKind::Class) => Some(ClassRef::External {
                module: module.clone(),
                class: base.to_string(),
            }),
            Some(MemberKind::Import(target)) => match self.import_value(target, depth + 1)? {
                Value::Class(class) => Some(class),
                _ => None,
            },
            Some(_) => None,
            None => builtin_type(base).map(ClassRef::Builtin),
        }
    }
}

fn builtin_instance(type_name: &'static str) -> Value<'static> {
    Value::Instance(ClassRef::Builtin(type_name))
}

fn is_dunder(name: &str) -> bool {
    name.len() > 4 && name.starts_with("__") && name.ends_with("__")
}

fn is_field(parent: Node<'_>, field: &str, child: Node<'_>) -> bool {
    let mut cursor = parent.walk();
    let found = parent
        .children_by_field_name(field, &mut cursor)
        .any(|node| node.id() == child.id());
    found
}

/// Whether `ident` is the name a parameter binds
fn is_parameter(ident: Node<'_>) -> bool {
    let Some(parent) = ident.parent() else {
        return false;
    };
    if matches!(parent.kind(), "parameters" | "lambda_parameters") {
        return true;
    }
    let names_parameter = parameter_name(parent).is_some_and(|name| name.id() == ident.id());
    names_parameter
        && parent.parent().is_some_and(|container| {
            matches!(
                container.kind(),
                "parameters" | "lambda_parameters" | "typed_parameter"
            )
        })
}

/// The identifier whose span contains `offset`, or else the one ending
/// exactly at it (cursor just past a name).
pub fn identifier_at(root: Node<'_>, offset: usize) -> Option<Node<'_>> {
    let mut containing = None;
    let mut ending = None;

    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.kind() == "identifier" {
            if node.start_byte() <= offset && offset < node.end_byte() {
                containing = Some(node);
            } else if node.end_byte() == offset {
                ending = Some(node);
            }
            continue;
        }

        let mut cursor = node.walk();
        let touching: Vec<_> = node
            .children(&mut cursor)
            .filter(|child| child.start_byte() <= offset && offset <= child.end_byte())
            .collect();
        stack.extend(touching.into_iter().rev());
    }

    containing.or(ending)
}
