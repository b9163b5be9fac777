use crate::config::LanguageOptions;
use std::borrow::Cow;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// What kind of code is handed to the external formatter.
pub enum EmbedKind {
    /// Content of a `<script>` region.
    Script,
    /// Content of a `<style>` region.
    Style,
    /// Expression wrapped in parentheses, like `(a + b)`.
    Expression,
    /// Binding pattern wrapped in a declaration, like `let { a, b } = 0`.
    Binding,
}

#[derive(Clone, Debug)]
/// Hints provide some useful additional information to the external formatter.
pub struct Hints<'b> {
    pub print_width: usize,
    /// Columns taken by indentation in front of the code.
    pub indent_level: usize,
    /// File extension of the code, like `js`, `ts`, `css` or `scss`.
    pub ext: &'b str,
    pub kind: EmbedKind,
}

pub(crate) struct Ctx<'b, E, F>
where
    F: for<'a> FnMut(&'a str, Hints) -> Result<Cow<'a, str>, E>,
{
    pub(crate) indent_width: usize,
    pub(crate) print_width: usize,
    pub(crate) options: &'b LanguageOptions,
    pub(crate) indent_level: usize,
    pub(crate) external_formatter: F,
    pub(crate) external_formatter_errors: Vec<E>,
}

impl<'b, E, F> Ctx<'b, E, F>
where
    F: for<'a> FnMut(&'a str, Hints) -> Result<Cow<'a, str>, E>,
{
    pub(crate) fn format_expr(&mut self, code: &str) -> String {
        if code.trim().is_empty() {
            String::new()
        } else {
            // Trim original code before sending it to the external formatter.
            // This makes sure the code will be trimmed
            // though external formatter isn't available.
            let wrapped = format!("({})", code.trim());
            let formatted = self.format_with_external_formatter(
                &wrapped,
                Hints {
                    print_width: self
                        .print_width
                        .saturating_sub(self.indent_level)
                        .saturating_sub(2),
                    indent_level: self.indent_level,
                    ext: "ts",
                    kind: EmbedKind::Expression,
                },
            );
            let formatted = formatted.trim().trim_matches(';');
            formatted
                .strip_prefix('(')
                .and_then(|s| s.strip_suffix(')'))
                .unwrap_or(formatted)
                .trim()
                .to_owned()
        }
    }

    pub(crate) fn format_binding(&mut self, code: &str) -> String {
        if code.trim().is_empty() {
            String::new()
        } else {
            let wrapped = format!("let {} = 0", code.trim());
            let formatted = self.format_with_external_formatter(
                &wrapped,
                Hints {
                    print_width: self
                        .print_width
                        .saturating_sub(self.indent_level)
                        .saturating_sub(2),
                    indent_level: self.indent_level,
                    ext: "ts",
                    kind: EmbedKind::Binding,
                },
            );
            let formatted = formatted.trim().trim_matches(';');
            formatted
                .strip_prefix("let ")
                .and_then(|s| s.strip_suffix(" = 0"))
                .unwrap_or(formatted)
                .trim()
                .to_owned()
        }
    }

    pub(crate) fn format_script<'a>(&mut self, code: &'a str, ext: &str) -> Cow<'a, str> {
        let print_width = self.embedded_print_width(self.options.script_indent);
        self.format_with_external_formatter(
            code,
            Hints {
                print_width,
                indent_level: self.indent_level,
                ext,
                kind: EmbedKind::Script,
            },
        )
    }

    pub(crate) fn format_style<'a>(&mut self, code: &'a str, ext: &str) -> Cow<'a, str> {
        let print_width = self.embedded_print_width(self.options.style_indent);
        self.format_with_external_formatter(
            code,
            Hints {
                print_width,
                indent_level: self.indent_level,
                ext,
                kind: EmbedKind::Style,
            },
        )
    }

    fn embedded_print_width(&self, indented: bool) -> usize {
        self.print_width
            .saturating_sub(self.indent_level)
            .saturating_sub(if indented { self.indent_width } else { 0 })
    }

    fn format_with_external_formatter<'a>(&mut self, code: &'a str, hints: Hints) -> Cow<'a, str> {
        match (self.external_formatter)(code, hints) {
            Ok(code) => code,
            Err(e) => {
                self.external_formatter_errors.push(e);
                code.into()
            }
        }
    }

    /// Runs `f` with one more level of indentation,
    /// so embedded code formatted inside knows where it will be placed.
    pub(crate) fn indented<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.indent_level += self.indent_width;
        let result = f(self);
        self.indent_level -= self.indent_width;
        result
    }
}
