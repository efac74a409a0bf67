//! Python scoping over a tree-sitter syntax tree
//!
//! Implements the LEGB rule directly on the tree:
//! - Local: the innermost function, lambda or comprehension
//! - Enclosing: outer functions; class bodies are skipped for nested code
//! - Global: the module
//! - Built-in: handled by the caller once every scope came up empty
//!
//! `global` and `nonlocal` declarations redirect a lookup to the module or to
//! the next enclosing function.

use super::parser::ParsedSource;
use std::collections::HashSet;
use tree_sitter::Node;

/// Scope-introducing constructs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Module,
    Class,
    Function,
    Lambda,
    Comprehension,
}

impl ScopeKind {
    pub fn of(node: Node<'_>) -> Option<Self> {
        match node.kind() {
            "module" => Some(Self::Module),
            "class_definition" => Some(Self::Class),
            "function_definition" => Some(Self::Function),
            "lambda" => Some(Self::Lambda),
            "list_comprehension"
            | "set_comprehension"
            | "dictionary_comprehension"
            | "generator_expression" => Some(Self::Comprehension),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Scope<'t> {
    pub node: Node<'t>,
    pub kind: ScopeKind,
}

impl<'t> Scope<'t> {
    pub fn new(node: Node<'t>) -> Option<Self> {
        ScopeKind::of(node).map(|kind| Self { node, kind })
    }
}

/// Scopes that contain `node`, innermost first, always ending with the module.
///
/// A function, lambda or class only encloses what sits in its `body`: names,
/// decorators, default values, annotations and base classes are evaluated in
/// the surrounding scope.
pub fn enclosing_scopes(node: Node<'_>) -> Vec<Scope<'_>> {
    let mut scopes = Vec::new();
    let mut child = node;
    let mut current = node.parent();

    while let Some(ancestor) = current {
        if let Some(scope) = Scope::new(ancestor) {
            let encloses = match scope.kind {
                ScopeKind::Module | ScopeKind::Comprehension => true,
                ScopeKind::Class | ScopeKind::Function | ScopeKind::Lambda => ancestor
                    .child_by_field_name("body")
                    .is_some_and(|body| body.id() == child.id()),
            };
            if encloses {
                scopes.push(scope);
            }
        }
        child = ancestor;
        current = ancestor.parent();
    }

    scopes
}

/// An `import` as written, before relative paths are resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportTarget {
    /// Dotted module path; may start with dots for relative imports
    pub module: String,
    /// Imported member for `from module import member`
    pub member: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingKind {
    Function,
    Class,
    Variable,
    Parameter,
    Import(ImportTarget),
}

/// A name bound in one scope
#[derive(Debug, Clone)]
pub struct Binding<'t> {
    pub name: &'t str,
    pub kind: BindingKind,
    /// The identifier at the binding site
    pub node: Node<'t>,
    /// Right-hand side for plain `name = value` assignments
    pub value: Option<Node<'t>>,
}

impl<'t> Binding<'t> {
    /// The `def`/`class` node for function and class bindings
    pub fn definition(&self) -> Option<Node<'t>> {
        match self.kind {
            BindingKind::Function | BindingKind::Class => self.node.parent(),
            _ => None,
        }
    }
}

/// Everything one scope binds or declares
#[derive(Debug, Default)]
pub struct ScopeBindings<'t> {
    pub bindings: Vec<Binding<'t>>,
    pub globals: HashSet<&'t str>,
    pub nonlocals: HashSet<&'t str>,
    /// Modules pulled in with `from module import *`
    pub star_imports: Vec<String>,
}

impl<'t> ScopeBindings<'t> {
    /// The binding of `name` visible at byte `position`: the last one at or
    /// before it, otherwise the first one after it (functions referring to
    /// names defined further down).
    pub fn find(&self, name: &str, position: usize) -> Option<&Binding<'t>> {
        let matching = self.bindings.iter().filter(|b| b.name == name);
        let first = matching.clone().next()?;
        matching
            .filter(|b| b.node.start_byte() <= position)
            .last()
            .or(Some(first))
    }
}

/// Collect the bindings of one scope without descending into nested scopes.
pub fn collect_bindings<'t>(source: &'t ParsedSource, scope: Scope<'t>) -> ScopeBindings<'t> {
    let mut collector = Collector {
        source,
        out: ScopeBindings::default(),
        pending: Vec::new(),
    };

    match scope.kind {
        ScopeKind::Module => collector.walk(scope.node),
        ScopeKind::Class => {
            if let Some(body) = scope.node.child_by_field_name("body") {
                collector.walk(body);
            }
        }
        ScopeKind::Function | ScopeKind::Lambda => {
            if let Some(parameters) = scope.node.child_by_field_name("parameters") {
                collector.parameters(parameters);
            }
            if scope.kind == ScopeKind::Function {
                if let Some(body) = scope.node.child_by_field_name("body") {
                    collector.walk(body);
                }
            }
        }
        ScopeKind::Comprehension => {
            let mut cursor = scope.node.walk();
            for clause in scope.node.named_children(&mut cursor) {
                if clause.kind() == "for_in_clause" {
                    if let Some(left) = clause.child_by_field_name("left") {
                        collector.targets(left, None);
                    }
                }
            }
        }
    }

    // Nodes are visited off a work stack, so restore source order for `find`
    collector.out.bindings.sort_by_key(|b| b.node.start_byte());
    collector.out
}

/// Push the named children of `node` so they pop in source order
fn push_children<'t>(stack: &mut Vec<Node<'t>>, node: Node<'t>) {
    let mut cursor = node.walk();
    let children: Vec<_> = node.named_children(&mut cursor).collect();
    stack.extend(children.into_iter().rev());
}

struct Collector<'t> {
    source: &'t ParsedSource,
    out: ScopeBindings<'t>,
    /// Statements and expressions still to visit
    pending: Vec<Node<'t>>,
}

impl<'t> Collector<'t> {
    fn bind(&mut self, node: Node<'t>, kind: BindingKind, value: Option<Node<'t>>) {
        self.out.bindings.push(Binding {
            name: self.source.text(node),
            kind,
            node,
            value,
        });
    }

    fn walk(&mut self, node: Node<'t>) {
        push_children(&mut self.pending, node);
        while let Some(next) = self.pending.pop() {
            self.statement(next);
        }
    }

    fn visit(&mut self, node: Node<'t>) {
        self.pending.push(node);
    }

    fn statement(&mut self, node: Node<'t>) {
        match node.kind() {
            "function_definition" | "class_definition" => {
                let kind = if node.kind() == "function_definition" {
                    BindingKind::Function
                } else {
                    BindingKind::Class
                };
                if let Some(name) = node.child_by_field_name("name") {
                    self.bind(name, kind, None);
                }
            }
            "lambda"
            | "list_comprehension"
            | "set_comprehension"
            | "dictionary_comprehension"
            | "generator_expression" => {}
            "assignment" => {
                let right = node.child_by_field_name("right");
                if let Some(left) = node.child_by_field_name("left") {
                    let value = right.filter(|_| left.kind() == "identifier");
                    self.targets(left, value);
                }
                if let Some(right) = right {
                    self.visit(right);
                }
            }
            "augmented_assignment" => {
                if let Some(left) = node.child_by_field_name("left") {
                    self.targets(left, None);
                }
                if let Some(right) = node.child_by_field_name("right") {
                    self.visit(right);
                }
            }
            "for_statement" => {
                if let Some(left) = node.child_by_field_name("left") {
                    self.targets(left, None);
                }
                for field in ["alternative", "body", "right"] {
                    if let Some(child) = node.child_by_field_name(field) {
                        self.visit(child);
                    }
                }
            }
            "as_pattern" => {
                if let Some(alias) = node.child_by_field_name("alias") {
                    self.targets(alias, None);
                }
                if let Some(value) = node.named_child(0) {
                    self.visit(value);
                }
            }
            "except_clause" => self.except_clause(node),
            "named_expression" => {
                let value = node.child_by_field_name("value");
                if let Some(name) = node.child_by_field_name("name") {
                    self.bind(name, BindingKind::Variable, value);
                }
                if let Some(value) = value {
                    self.visit(value);
                }
            }
            "import_statement" => self.import(node),
            "import_from_statement" => self.import_from(node),
            "global_statement" | "nonlocal_statement" => {
                let global = node.kind() == "global_statement";
                let mut cursor = node.walk();
                for name in node.named_children(&mut cursor) {
                    if name.kind() != "identifier" {
                        continue;
                    }
                    let name = self.source.text(name);
                    if global {
                        self.out.globals.insert(name);
                    } else {
                        self.out.nonlocals.insert(name);
                    }
                }
            }
            _ => push_children(&mut self.pending, node),
        }
    }

    fn except_clause(&mut self, node: Node<'t>) {
        let mut after_as = false;
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if !child.is_named() {
                after_as = child.kind() == "as";
                continue;
            }
            if after_as && child.kind() == "identifier" {
                self.bind(child, BindingKind::Variable, None);
            } else {
                self.visit(child);
            }
            after_as = false;
        }
    }

    /// Bind every name in an assignment target
    fn targets(&mut self, node: Node<'t>, value: Option<Node<'t>>) {
        if node.kind() == "identifier" {
            self.bind(node, BindingKind::Variable, value);
            return;
        }
        let mut stack = vec![node];
        while let Some(node) = stack.pop() {
            match node.kind() {
                "identifier" => self.bind(node, BindingKind::Variable, None),
                "attribute" | "subscript" => {}
                "as_pattern_target" if node.named_child_count() == 0 => {
                    self.bind(node, BindingKind::Variable, None)
                }
                _ => push_children(&mut stack, node),
            }
        }
    }

    fn parameters(&mut self, node: Node<'t>) {
        let mut cursor = node.walk();
        for param in node.named_children(&mut cursor) {
            if let Some(name) = parameter_name(param) {
                self.bind(name, BindingKind::Parameter, None);
            }
        }
    }

    fn import(&mut self, node: Node<'t>) {
        let mut cursor = node.walk();
        for name in node.children_by_field_name("name", &mut cursor) {
            match name.kind() {
                "dotted_name" => {
                    // `import a.b.c` binds `a`
                    if let Some(first) = name.named_child(0) {
                        let module = self.source.text(first).to_string();
                        self.bind(
                            first,
                            BindingKind::Import(ImportTarget {
                                module,
                                member: None,
                            }),
                            None,
                        );
                    }
                }
                "aliased_import" => {
                    let module = name.child_by_field_name("name");
                    let alias = name.child_by_field_name("alias");
                    if let (Some(module), Some(alias)) = (module, alias) {
                        let module = self.source.text(module).to_string();
                        self.bind(
                            alias,
                            BindingKind::Import(ImportTarget {
                                module,
                                member: None,
                            }),
                            None,
                        );
                    }
                }
                _ => {}
            }
        }
    }

    fn import_from(&mut self, node: Node<'t>) {
        let Some(module) = node.child_by_field_name("module_name") else {
            return;
        };
        let module = import_module_text(self.source, module);

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() == "wildcard_import" {
                self.out.star_imports.push(module.clone());
            }
        }

        let mut cursor = node.walk();
        for name in node.children_by_field_name("name", &mut cursor) {
            let (member, bound) = match name.kind() {
                "dotted_name" => (Some(name), name.named_child(0)),
                "aliased_import" => (
                    name.child_by_field_name("name"),
                    name.child_by_field_name("alias"),
                ),
                _ => (None, None),
            };
            if let (Some(member), Some(bound)) = (member, bound) {
                let target = ImportTarget {
                    module: module.clone(),
                    member: Some(self.source.text(member).to_string()),
                };
                self.bind(bound, BindingKind::Import(target), None);
            }
        }
    }
}

/// Module path of a `from ... import` statement, whitespace removed so
/// `from . pkg import x` reads as `.pkg`
pub fn import_module_text(source: &ParsedSource, module: Node<'_>) -> String {
    source
        .text(module)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// The identifier a parameter node binds
pub fn parameter_name(param: Node<'_>) -> Option<Node<'_>> {
    match param.kind() {
        "identifier" => Some(param),
        "default_parameter" | "typed_default_parameter" => param
            .child_by_field_name("name")
            .filter(|name| name.kind() == "identifier"),
        "typed_parameter" | "list_splat_pattern" | "dictionary_splat_pattern" => {
            let first = param.named_child(0)?;
            parameter_name(first)
        }
        _ => None,
    }
}

/// Where a name lookup ended
#[derive(Debug)]
pub enum Lookup<'t> {
    /// Bound in `chain[0]`; `chain` continues outwards to the module
    Bound {
        binding: Binding<'t>,
        chain: Vec<Scope<'t>>,
    },
    /// No scope binds the name; the module's star imports may still provide it
    Unbound { star_imports: Vec<String> },
}

/// Resolve `name` as referenced by `reference` following LEGB.
pub fn lookup<'t>(source: &'t ParsedSource, name: &str, reference: Node<'t>) -> Lookup<'t> {
    let scopes = enclosing_scopes(reference);
    let position = reference.start_byte();
    let module_index = scopes.len().saturating_sub(1);
    let mut star_imports = Vec::new();

    let mut index = 0;
    while index < scopes.len() {
        let scope = scopes[index];

        // Class bodies are only visible to code directly inside them
        if scope.kind == ScopeKind::Class && index > 0 {
            index += 1;
            continue;
        }

        let bindings = collect_bindings(source, scope);
        if scope.kind == ScopeKind::Module {
            star_imports = bindings.star_imports.clone();
        }

        if index < module_index && bindings.globals.contains(name) {
            index = module_index;
            continue;
        }
        if !bindings.nonlocals.contains(name) {
            if let Some(binding) = bindings.find(name, position) {
                return Lookup::Bound {
                    binding: binding.clone(),
                    chain: scopes[index..].to_vec(),
                };
            }
        }
        index += 1;
    }

    Lookup::Unbound { star_imports }
}

/// Dotted path of a name bound in `chain[0]`, or `None` when any scope on the
/// way to the module is a function-like frame.
pub fn qualified_name(
    source: &ParsedSource,
    module: &str,
    name: &str,
    chain: &[Scope<'_>],
) -> Option<String> {
    let mut classes = Vec::new();
    for scope in chain {
        match scope.kind {
            ScopeKind::Module => break,
            ScopeKind::Class => {
                let class_name = scope.node.child_by_field_name("name")?;
                classes.push(source.text(class_name));
            }
            _ => return None,
        }
    }

    let mut parts = Vec::with_capacity(classes.len() + 2);
    if !module.is_empty() {
        parts.push(module);
    }
    parts.extend(classes.into_iter().rev());
    parts.push(name);
    Some(parts.join("."))
}

/// Scope chain of a class body: the class itself, then what encloses it
pub fn class_chain(class: Node<'_>) -> Vec<Scope<'_>> {
    let mut chain = vec![Scope {
        node: class,
        kind: ScopeKind::Class,
    }];
    chain.extend(enclosing_scopes(class));
    chain
}

/// How a method receives its first argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
    Instance,
    Class,
}

/// Methods defined directly in a class body, with their decorators
fn methods(class: Node<'_>) -> Vec<(Node<'_>, Option<Node<'_>>)> {
    let Some(body) = class.child_by_field_name("body") else {
        return Vec::new();
    };
    let mut methods = Vec::new();
    let mut cursor = body.walk();
    for child in body.named_children(&mut cursor) {
        match child.kind() {
            "function_definition" => methods.push((child, None)),
            "decorated_definition" => {
                if let Some(def) = child
                    .child_by_field_name("definition")
                    .filter(|def| def.kind() == "function_definition")
                {
                    methods.push((def, Some(child)));
                }
            }
            _ => {}
        }
    }
    methods
}

fn receiver_kind(source: &ParsedSource, decorated: Option<Node<'_>>) -> Option<Receiver> {
    let Some(decorated) = decorated else {
        return Some(Receiver::Instance);
    };
    let mut cursor = decorated.walk();
    for decorator in decorated.named_children(&mut cursor) {
        if decorator.kind() != "decorator" {
            continue;
        }
        match source.text(decorator).trim_start_matches('@').trim() {
            "staticmethod" => return None,
            "classmethod" => return Some(Receiver::Class),
            _ => {}
        }
    }
    Some(Receiver::Instance)
}

fn first_parameter(function: Node<'_>) -> Option<Node<'_>> {
    let parameters = function.child_by_field_name("parameters")?;
    let first = parameters.named_child(0)?;
    parameter_name(first)
}

/// If `param` is the `self`/`cls` parameter of a method, the class it
/// belongs to and what it receives.
pub fn method_receiver<'t>(
    source: &'t ParsedSource,
    param: Node<'t>,
) -> Option<(Node<'t>, Receiver)> {
    let mut function = param.parent()?;
    while function.kind() != "function_definition" {
        function = function.parent()?;
    }
    if first_parameter(function)?.id() != param.id() {
        return None;
    }

    let mut container = function.parent()?;
    let decorated = if container.kind() == "decorated_definition" {
        let decorated = container;
        container = container.parent()?;
        Some(decorated)
    } else {
        None
    };

    let class = container.parent().filter(|c| {
        c.kind() == "class_definition"
            && c.child_by_field_name("body")
                .is_some_and(|body| body.id() == container.id())
    })?;

    receiver_kind(source, decorated).map(|receiver| (class, receiver))
}

/// Attributes assigned through the instance parameter (`self.x = ...`) in
/// the methods of `class`.
pub fn instance_attributes<'t>(source: &'t ParsedSource, class: Node<'t>) -> Vec<Binding<'t>> {
    let mut found = Vec::new();
    for (method, decorated) in methods(class) {
        if receiver_kind(source, decorated) != Some(Receiver::Instance) {
            continue;
        }
        let (Some(receiver), Some(body)) =
            (first_parameter(method), method.child_by_field_name("body"))
        else {
            continue;
        };
        collect_self_assignments(source, body, source.text(receiver), &mut found);
    }
    found
}

fn collect_self_assignments<'t>(
    source: &'t ParsedSource,
    body: Node<'t>,
    receiver: &str,
    found: &mut Vec<Binding<'t>>,
) {
    let mut stack = Vec::new();
    push_children(&mut stack, body);
    while let Some(node) = stack.pop() {
        match node.kind() {
            "function_definition" | "class_definition" | "lambda" => continue,
            "assignment" | "augmented_assignment" => {
                if let Some(left) = node.child_by_field_name("left") {
                    self_targets(source, left, receiver, node.child_by_field_name("right"), found);
                }
            }
            _ => {}
        }
        push_children(&mut stack, node);
    }
}

fn self_targets<'t>(
    source: &'t ParsedSource,
    target: Node<'t>,
    receiver: &str,
    value: Option<Node<'t>>,
    found: &mut Vec<Binding<'t>>,
) {
    // Only a lone `self.x` target carries the assigned value
    let mut stack = vec![(target, value)];
    while let Some((target, value)) = stack.pop() {
        match target.kind() {
            "attribute" => {
                let object = target.child_by_field_name("object");
                let attribute = target.child_by_field_name("attribute");
                if let (Some(object), Some(attribute)) = (object, attribute) {
                    if object.kind() == "identifier" && source.text(object) == receiver {
                        found.push(Binding {
                            name: source.text(attribute),
                            kind: BindingKind::Variable,
                            node: attribute,
                            value,
                        });
                    }
                }
            }
            "pattern_list" | "tuple_pattern" | "list_pattern" => {
                let mut elements = Vec::new();
                push_children(&mut elements, target);
                stack.extend(elements.into_iter().map(|element| (element, None)));
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::python::PythonParser;

    fn parse(code: &str) -> ParsedSource {
        PythonParser::new().unwrap().parse(code.to_string()).unwrap()
    }

    /// The `nth` identifier spelled `text`, in source order
    fn ident<'t>(source: &'t ParsedSource, text: &str, nth: usize) -> Node<'t> {
        let mut found = Vec::new();
        let mut stack = vec![source.root()];
        while let Some(node) = stack.pop() {
            if node.kind() == "identifier" && source.text(node) == text {
                found.push(node);
            }
            push_children(&mut stack, node);
        }
        found[nth]
    }

    fn bound_kind(lookup: Lookup<'_>) -> Option<BindingKind> {
        match lookup {
            Lookup::Bound { binding, .. } => Some(binding.kind),
            Lookup::Unbound { .. } => None,
        }
    }

    #[test]
    fn test_module_bindings() {
        let source = parse(
            "import os.path\nimport numpy as np\nfrom . import sibling\nfrom pkg.mod import a as b, c\nfrom m import *\nx = 1\ndef f(): pass\nclass C: pass\n",
        );
        let scope = Scope::new(source.root()).unwrap();
        let bindings = collect_bindings(&source, scope);
        let names: Vec<_> = bindings.bindings.iter().map(|b| b.name).collect();
        assert_eq!(names, ["os", "np", "sibling", "b", "c", "x", "f", "C"]);
        assert_eq!(bindings.star_imports, ["m"]);

        let b = bindings.bindings.iter().find(|b| b.name == "b").unwrap();
        assert_eq!(
            b.kind,
            BindingKind::Import(ImportTarget {
                module: "pkg.mod".to_string(),
                member: Some("a".to_string()),
            })
        );
        let sibling = bindings.bindings.iter().find(|b| b.name == "sibling").unwrap();
        assert_eq!(
            sibling.kind,
            BindingKind::Import(ImportTarget {
                module: ".".to_string(),
                member: Some("sibling".to_string()),
            })
        );
    }

    #[test]
    fn test_function_scope_and_shadowing() {
        let source = parse("x = 1\ndef f(x):\n    return x\nprint(x)\n");
        let inner = ident(&source, "x", 2);
        let Lookup::Bound { binding, chain } = lookup(&source, "x", inner) else {
            panic!("x should be bound");
        };
        assert_eq!(binding.kind, BindingKind::Parameter);
        assert_eq!(chain[0].kind, ScopeKind::Function);

        let outer = ident(&source, "x", 3);
        let Lookup::Bound { binding, chain } = lookup(&source, "x", outer) else {
            panic!("x should be bound");
        };
        assert_eq!(binding.kind, BindingKind::Variable);
        assert_eq!(
            qualified_name(&source, "mod", binding.name, &chain).as_deref(),
            Some("mod.x")
        );
    }

    #[test]
    fn test_class_scope_skipped_for_methods() {
        let source = parse("y = 0\nclass C:\n    y = 1\n    def m(self):\n        return y\n");
        let usage = ident(&source, "y", 2);
        let Lookup::Bound { chain, .. } = lookup(&source, "y", usage) else {
            panic!("y should be bound");
        };
        assert_eq!(chain[0].kind, ScopeKind::Module);
    }

    #[test]
    fn test_global_and_nonlocal() {
        let source = parse(
            "v = 0\ndef outer():\n    v = 1\n    def inner():\n        global v\n        return v\n    return inner\n",
        );
        let usage = ident(&source, "v", 3);
        let Lookup::Bound { chain, .. } = lookup(&source, "v", usage) else {
            panic!("v should be bound");
        };
        assert_eq!(chain.len(), 1);

        let source = parse(
            "def outer():\n    v = 1\n    def inner():\n        nonlocal v\n        return v\n    return inner\n",
        );
        let usage = ident(&source, "v", 2);
        let Lookup::Bound { chain, .. } = lookup(&source, "v", usage) else {
            panic!("v should be bound");
        };
        assert_eq!(chain[0].kind, ScopeKind::Function);
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn test_deeply_nested_expressions() {
        let depth = 20_000;
        let nested = format!("{}[]{}", "(".repeat(depth), ")".repeat(depth));
        let source = parse(&format!(
            "data = {nested}\nclass Box:\n    def __init__(self):\n        self.items = {nested}\nprint(data)\n"
        ));

        let usage = ident(&source, "data", 1);
        assert_eq!(
            bound_kind(lookup(&source, "data", usage)),
            Some(BindingKind::Variable)
        );

        let class = ident(&source, "Box", 0).parent().unwrap();
        let names: Vec<_> = instance_attributes(&source, class)
            .iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, ["items"]);
    }

    #[test]
    fn test_later_binding_and_unbound() {
        let source = parse("def f():\n    return helper()\ndef helper(): pass\n");
        let usage = ident(&source, "helper", 0);
        assert_eq!(
            bound_kind(lookup(&source, "helper", usage)),
            Some(BindingKind::Function)
        );

        let source = parse("from star import *\nprint(thing)\n");
        let usage = ident(&source, "thing", 0);
        match lookup(&source, "thing", usage) {
            Lookup::Unbound { star_imports } => assert_eq!(star_imports, ["star"]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_comprehension_and_lambda_bindings() {
        let source = parse("items = []\nsquares = [i * i for i in items]\nf = lambda a: a\n");
        let usage = ident(&source, "i", 0);
        let Lookup::Bound { chain, .. } = lookup(&source, "i", usage) else {
            panic!("i should be bound");
        };
        assert_eq!(chain[0].kind, ScopeKind::Comprehension);

        let usage = ident(&source, "a", 1);
        let Lookup::Bound { binding, chain } = lookup(&source, "a", usage) else {
            panic!("a should be bound");
        };
        assert_eq!(binding.kind, BindingKind::Parameter);
        assert!(qualified_name(&source, "m", "a", &chain).is_none());
    }

    #[test]
    fn test_nested_class_qualified_name() {
        let source = parse("class Outer:\n    class Inner:\n        def run(self): pass\n");
        let run = ident(&source, "run", 0);
        let def = run.parent().unwrap();
        let chain = enclosing_scopes(def);
        assert_eq!(
            qualified_name(&source, "pkg.mod", "run", &chain).as_deref(),
            Some("pkg.mod.Outer.Inner.run")
        );
    }

    #[test]
    fn test_method_receiver_and_instance_attributes() {
        let source = parse(
            "class C:\n    def __init__(self, n):\n        self.count = n\n        self.a, self.b = 1, 2\n    @classmethod\n    def make(cls): pass\n    @staticmethod\n    def util(x): pass\n",
        );
        let class = source.root().named_child(0).unwrap();

        let self_param = ident(&source, "self", 0);
        let (owner, receiver) = method_receiver(&source, self_param).unwrap();
        assert_eq!(owner.id(), class.id());
        assert_eq!(receiver, Receiver::Instance);

        let cls = ident(&source, "cls", 0);
        assert_eq!(method_receiver(&source, cls).unwrap().1, Receiver::Class);

        let x = ident(&source, "x", 0);
        assert!(method_receiver(&source, x).is_none());

        let n = ident(&source, "n", 0);
        assert!(method_receiver(&source, n).is_none());

        let names: Vec<_> = instance_attributes(&source, class)
            .iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, ["count", "a", "b"]);
    }
}
