//! Canonical printing of AST documents back to GraphQL text.
//!
//! The printer produces a normalized rendering: two-space indentation,
//! one selection per line, single-line string literals with escapes.
//! Printing is lossless with respect to semantics — for any valid
//! document, `parse(print(parse(source)))` equals `parse(source)` up to
//! location metadata.

use crate::ast;
use inherent::inherent;

/// Prints a document to canonical GraphQL text.
pub fn print_document(document: &ast::Document) -> String {
    let mut out = String::new();
    document.print_into(&mut out, 0);
    out
}

/// Nodes that can render themselves as canonical GraphQL text.
///
/// `indent` is the current indentation depth in levels (two spaces
/// per level); value nodes render inline and ignore it.
pub trait AstPrint {
    fn print_into(&self, out: &mut String, indent: usize);
}

fn push_indent(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push_str("  ");
    }
}

fn print_directives(directives: &[ast::Directive], out: &mut String) {
    for directive in directives {
        out.push(' ');
        directive.print_into(out, 0);
    }
}

fn print_arguments(arguments: &[ast::Argument], out: &mut String) {
    if arguments.is_empty() {
        return;
    }
    out.push('(');
    for (i, argument) in arguments.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        argument.print_into(out, 0);
    }
    out.push(')');
}

/// Escapes a string for a single-line string literal.
fn push_escaped_string(value: &str, out: &mut String) {
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04X}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

#[inherent]
impl AstPrint for ast::Document {
    pub fn print_into(&self, out: &mut String, indent: usize) {
        for (i, definition) in self.definitions.iter().enumerate() {
            if i > 0 {
                out.push_str("\n\n");
            }
            definition.print_into(out, indent);
        }
        out.push('\n');
    }
}

#[inherent]
impl AstPrint for ast::Definition {
    pub fn print_into(&self, out: &mut String, indent: usize) {
        match self {
            ast::Definition::Operation(op) => op.print_into(out, indent),
            ast::Definition::Fragment(frag) => frag.print_into(out, indent),
        }
    }
}

#[inherent]
impl AstPrint for ast::OperationDefinition {
    pub fn print_into(&self, out: &mut String, indent: usize) {
        let shorthand = self.kind == ast::OperationKind::Query
            && self.name.is_none()
            && self.variable_definitions.is_empty()
            && self.directives.is_empty();

        if !shorthand {
            out.push_str(self.kind.keyword());
            if let Some(name) = &self.name {
                out.push(' ');
                out.push_str(&name.value);
            }
            if !self.variable_definitions.is_empty() {
                out.push('(');
                for (i, var_def) in self.variable_definitions.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    var_def.print_into(out, 0);
                }
                out.push(')');
            }
            print_directives(&self.directives, out);
            out.push(' ');
        }
        self.selection_set.print_into(out, indent);
    }
}

#[inherent]
impl AstPrint for ast::FragmentDefinition {
    pub fn print_into(&self, out: &mut String, indent: usize) {
        out.push_str("fragment ");
        out.push_str(&self.name.value);
        out.push_str(" on ");
        out.push_str(&self.type_condition.on.value);
        print_directives(&self.directives, out);
        out.push(' ');
        self.selection_set.print_into(out, indent);
    }
}

#[inherent]
impl AstPrint for ast::VariableDefinition {
    pub fn print_into(&self, out: &mut String, _indent: usize) {
        out.push('$');
        out.push_str(&self.name.value);
        out.push_str(": ");
        self.var_type.print_into(out, 0);
        if let Some(default) = &self.default_value {
            out.push_str(" = ");
            default.print_into(out, 0);
        }
        print_directives(&self.directives, out);
    }
}

#[inherent]
impl AstPrint for ast::TypeAnnotation {
    pub fn print_into(&self, out: &mut String, _indent: usize) {
        match self {
            ast::TypeAnnotation::Named { name, .. } => out.push_str(&name.value),
            ast::TypeAnnotation::List { inner, .. } => {
                out.push('[');
                inner.print_into(out, 0);
                out.push(']');
            }
            ast::TypeAnnotation::NonNull { inner, .. } => {
                inner.print_into(out, 0);
                out.push('!');
            }
        }
    }
}

#[inherent]
impl AstPrint for ast::SelectionSet {
    pub fn print_into(&self, out: &mut String, indent: usize) {
        out.push_str("{\n");
        for selection in &self.selections {
            push_indent(out, indent + 1);
            selection.print_into(out, indent + 1);
            out.push('\n');
        }
        push_indent(out, indent);
        out.push('}');
    }
}

#[inherent]
impl AstPrint for ast::Selection {
    pub fn print_into(&self, out: &mut String, indent: usize) {
        match self {
            ast::Selection::Field(field) => field.print_into(out, indent),
            ast::Selection::FragmentSpread(spread) => spread.print_into(out, indent),
            ast::Selection::InlineFragment(inline) => inline.print_into(out, indent),
        }
    }
}

#[inherent]
impl AstPrint for ast::Field {
    pub fn print_into(&self, out: &mut String, indent: usize) {
        if let Some(alias) = &self.alias {
            out.push_str(&alias.value);
            out.push_str(": ");
        }
        out.push_str(&self.name.value);
        print_arguments(&self.arguments, out);
        print_directives(&self.directives, out);
        if let Some(selection_set) = &self.selection_set {
            out.push(' ');
            selection_set.print_into(out, indent);
        }
    }
}

#[inherent]
impl AstPrint for ast::FragmentSpread {
    pub fn print_into(&self, out: &mut String, _indent: usize) {
        out.push_str("...");
        out.push_str(&self.name.value);
        print_directives(&self.directives, out);
    }
}

#[inherent]
impl AstPrint for ast::InlineFragment {
    pub fn print_into(&self, out: &mut String, indent: usize) {
        out.push_str("...");
        if let Some(condition) = &self.type_condition {
            out.push_str(" on ");
            out.push_str(&condition.on.value);
        }
        print_directives(&self.directives, out);
        out.push(' ');
        self.selection_set.print_into(out, indent);
    }
}

#[inherent]
impl AstPrint for ast::Directive {
    pub fn print_into(&self, out: &mut String, _indent: usize) {
        out.push('@');
        out.push_str(&self.name.value);
        print_arguments(&self.arguments, out);
    }
}

#[inherent]
impl AstPrint for ast::Argument {
    pub fn print_into(&self, out: &mut String, _indent: usize) {
        out.push_str(&self.name.value);
        out.push_str(": ");
        self.value.print_into(out, 0);
    }
}

#[inherent]
impl AstPrint for ast::Value {
    pub fn print_into(&self, out: &mut String, _indent: usize) {
        match self {
            ast::Value::Variable(variable) => {
                out.push('$');
                out.push_str(&variable.name.value);
            }
            ast::Value::Int(int_value) => {
                out.push_str(&int_value.value.to_string());
            }
            ast::Value::Float(float_value) => {
                // `f64`'s Display never uses exponent notation, but it
                // renders whole floats without a fraction; re-add one so
                // the literal parses back as a float.
                let mut rendered = float_value.value.to_string();
                if !rendered.contains('.') {
                    rendered.push_str(".0");
                }
                out.push_str(&rendered);
            }
            ast::Value::String(string_value) => {
                push_escaped_string(&string_value.value, out);
            }
            ast::Value::Boolean(boolean_value) => {
                out.push_str(if boolean_value.value { "true" } else { "false" });
            }
            ast::Value::Null(_) => out.push_str("null"),
            ast::Value::Enum(enum_value) => out.push_str(&enum_value.value),
            ast::Value::List(list_value) => {
                out.push('[');
                for (i, item) in list_value.items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    item.print_into(out, 0);
                }
                out.push(']');
            }
            ast::Value::Object(object_value) => {
                out.push('{');
                for (i, field) in object_value.fields.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push(' ');
                    out.push_str(&field.name.value);
                    out.push_str(": ");
                    field.value.print_into(out, 0);
                }
                if !object_value.fields.is_empty() {
                    out.push(' ');
                }
                out.push('}');
            }
        }
    }
}
