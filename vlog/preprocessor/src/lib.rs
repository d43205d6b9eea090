//! Verilog preprocessor: a line-oriented directive interpreter.
//!
//! [`Preprocessor::process`] consumes one logical file at a time. The macro
//! table and include-path configuration persist across calls; the
//! conditional-compilation stack is scoped to each top-level call and must
//! be empty again at end-of-file.
//!
//! All directive-level errors are recoverable (a diagnostic is recorded and
//! the line dropped), except an unbalanced conditional stack at end of a
//! top-level file, which fails the whole file.

mod diagnostics;

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use tokens::lexer::{is_ident_continue, is_ident_start};

pub use crate::diagnostics::{Diagnostics, PreprocessError, PreprocessorDiagnostic};

type MacroTable = IndexMap<String, String, ahash::RandomState>;

/// One frame per open `ifdef/`ifndef.
///
/// `matched` implements first-match-wins for `elsif chains: once any branch
/// of the chain has been taken it stays set, and every later `elsif/`else
/// in the chain is inactive regardless of its own condition.
#[derive(Debug, Clone, Copy)]
struct CondFrame {
    active: bool,
    matched: bool,
    had_else: bool,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Directive {
    Define,
    Undef,
    Include,
    IfDef,
    IfNotDef,
    Else,
    ElseIf,
    EndIf,
    /// `timescale, `line, `pragma, `begin_keywords, `end_keywords:
    /// recognized but emitted verbatim, no semantic effect here.
    Passthrough,
}

impl Directive {
    fn from_name(name: &str) -> Option<Directive> {
        let directive = match name {
            "define" => Directive::Define,
            "undef" => Directive::Undef,
            "include" => Directive::Include,
            "ifdef" => Directive::IfDef,
            "ifndef" => Directive::IfNotDef,
            "else" => Directive::Else,
            "elsif" => Directive::ElseIf,
            "endif" => Directive::EndIf,
            "timescale" | "line" | "pragma" | "begin_keywords" | "end_keywords" => {
                Directive::Passthrough
            }
            _ => return None,
        };
        Some(directive)
    }
}

#[derive(Default)]
pub struct Preprocessor {
    macros: MacroTable,
    include_dirs: Vec<Utf8PathBuf>,
    /// In-flight include chain, innermost last. Re-entering a path already
    /// on this stack is a cyclic include.
    include_stack: Vec<Utf8PathBuf>,
    cond_stack: Vec<CondFrame>,
    diagnostics: Diagnostics,
}

impl Preprocessor {
    pub fn new() -> Preprocessor {
        Preprocessor::default()
    }

    /// Define a macro, as if by `` `define name value ``. Redefinition
    /// silently overwrites.
    pub fn define(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.macros.insert(name.into(), value.into());
    }

    pub fn undefine(&mut self, name: &str) {
        self.macros.shift_remove(name);
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    pub fn defines(&self) -> impl Iterator<Item = (&str, &str)> {
        self.macros.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn add_include_dir(&mut self, dir: impl Into<Utf8PathBuf>) {
        self.include_dirs.push(dir.into());
    }

    pub fn diagnostics(&self) -> &[PreprocessorDiagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Diagnostics {
        std::mem::take(&mut self.diagnostics)
    }

    /// Preprocess a whole file's text. `origin` names the file for include
    /// resolution and diagnostics; it is not read from disk.
    pub fn process(&mut self, src: &str, origin: &Utf8Path) -> Result<String, PreprocessError> {
        self.cond_stack.clear();
        self.include_stack.clear();
        self.include_stack.push(origin.to_owned());

        let mut out = String::with_capacity(src.len());
        self.process_source(src, origin, &mut out);
        self.include_stack.pop();

        if !self.cond_stack.is_empty() {
            let open = self.cond_stack.len();
            self.cond_stack.clear();
            return Err(PreprocessError::UnbalancedConditional { file: origin.to_owned(), open });
        }

        // A source without a trailing newline round-trips without one.
        if !src.ends_with('\n') && out.ends_with('\n') {
            out.pop();
        }
        Ok(out)
    }

    fn process_source(&mut self, src: &str, origin: &Utf8Path, out: &mut String) {
        let lines: Vec<&str> = src.split('\n').collect();

        let mut i = 0;
        while i < lines.len() {
            let lineno = (i + 1) as u32;
            // last element of split('\n') on newline-terminated text is ""
            if i + 1 == lines.len() && lines[i].is_empty() {
                break;
            }

            // Join `\`-continued lines into one logical line (backslash
            // replaced by a single space) before directive recognition.
            let mut logical = lines[i].to_owned();
            while ends_in_continuation(&logical) && i + 1 < lines.len() {
                let trimmed = logical.trim_end();
                logical = format!("{} {}", &trimmed[..trimmed.len() - 1], lines[i + 1]);
                i += 1;
            }

            self.handle_line(&logical, lineno, origin, out);
            i += 1;
        }
    }

    fn handle_line(&mut self, line: &str, lineno: u32, origin: &Utf8Path, out: &mut String) {
        if let Some(name) = directive_name(line) {
            let args = &line.trim_start()[1 + name.len()..];
            match Directive::from_name(name) {
                Some(directive) => self.directive(directive, args, line, lineno, origin, out),
                // Unrecognized directives pass through unchanged.
                None if self.active() => emit(out, line),
                None => {}
            }
            return;
        }

        if !self.active() {
            return;
        }
        emit(out, &self.expand_macros(line));
    }

    /// True iff every frame on the conditional stack is active. Lines are
    /// suppressed when *any* enclosing frame is inactive, not only the
    /// innermost one.
    fn active(&self) -> bool {
        self.cond_stack.iter().all(|frame| frame.active)
    }

    fn directive(
        &mut self,
        directive: Directive,
        args: &str,
        line: &str,
        lineno: u32,
        origin: &Utf8Path,
        out: &mut String,
    ) {
        match directive {
            Directive::IfDef => self.push_conditional(args, false, lineno, origin),
            Directive::IfNotDef => self.push_conditional(args, true, lineno, origin),
            Directive::ElseIf => self.else_if(args, lineno, origin),
            Directive::Else => self.else_branch(lineno, origin),
            Directive::EndIf => self.end_if(lineno, origin),
            Directive::Define if self.active() => self.define_directive(args, lineno, origin),
            Directive::Undef if self.active() => self.undef_directive(args, lineno, origin),
            Directive::Include if self.active() => self.include(args, lineno, origin, out),
            Directive::Passthrough if self.active() => emit(out, line),
            // suppressed by an inactive conditional region
            _ => {}
        }
    }

    fn push_conditional(&mut self, args: &str, invert: bool, lineno: u32, origin: &Utf8Path) {
        let directive = if invert { "ifndef" } else { "ifdef" };
        let Some(name) = macro_name(args) else {
            self.report(PreprocessorDiagnostic::MalformedDirective {
                directive,
                file: origin.to_owned(),
                line: lineno,
            });
            return;
        };

        if !self.active() {
            // Dead region: the whole nested chain stays inactive, so mark
            // it as already matched.
            self.cond_stack.push(CondFrame { active: false, matched: true, had_else: false });
            return;
        }

        let taken = self.macros.contains_key(name) != invert;
        self.cond_stack.push(CondFrame { active: taken, matched: taken, had_else: false });
    }

    fn else_if(&mut self, args: &str, lineno: u32, origin: &Utf8Path) {
        let Some(top) = self.cond_stack.len().checked_sub(1) else {
            self.report(PreprocessorDiagnostic::MisplacedElsif {
                file: origin.to_owned(),
                line: lineno,
            });
            return;
        };
        if self.cond_stack[top].had_else {
            self.report(PreprocessorDiagnostic::ElsifAfterElse {
                file: origin.to_owned(),
                line: lineno,
            });
            return;
        }
        let Some(name) = macro_name(args) else {
            self.report(PreprocessorDiagnostic::MalformedDirective {
                directive: "elsif",
                file: origin.to_owned(),
                line: lineno,
            });
            return;
        };

        let enclosing_active = self.cond_stack[..top].iter().all(|frame| frame.active);
        let defined = self.macros.contains_key(name);
        let frame = &mut self.cond_stack[top];
        frame.active = enclosing_active && !frame.matched && defined;
        frame.matched |= frame.active;
    }

    fn else_branch(&mut self, lineno: u32, origin: &Utf8Path) {
        let Some(top) = self.cond_stack.len().checked_sub(1) else {
            self.report(PreprocessorDiagnostic::MisplacedElse {
                file: origin.to_owned(),
                line: lineno,
            });
            return;
        };
        if self.cond_stack[top].had_else {
            self.report(PreprocessorDiagnostic::DuplicateElse {
                file: origin.to_owned(),
                line: lineno,
            });
            return;
        }

        let enclosing_active = self.cond_stack[..top].iter().all(|frame| frame.active);
        let frame = &mut self.cond_stack[top];
        frame.active = enclosing_active && !frame.matched;
        frame.matched = true;
        frame.had_else = true;
    }

    fn end_if(&mut self, lineno: u32, origin: &Utf8Path) {
        if self.cond_stack.pop().is_none() {
            self.report(PreprocessorDiagnostic::MisplacedEndif {
                file: origin.to_owned(),
                line: lineno,
            });
        }
    }

    fn define_directive(&mut self, args: &str, lineno: u32, origin: &Utf8Path) {
        let Some(name) = macro_name(args) else {
            self.report(PreprocessorDiagnostic::MalformedDirective {
                directive: "define",
                file: origin.to_owned(),
                line: lineno,
            });
            return;
        };
        // Raw trailing text; existing macros are not substituted into the
        // replacement at definition time.
        let value = args.trim_start()[name.len()..].trim().to_owned();
        if self.macros.insert(name.to_owned(), value).is_some() {
            log::debug!("{origin}:{lineno}: macro {name} redefined");
        }
    }

    fn undef_directive(&mut self, args: &str, lineno: u32, origin: &Utf8Path) {
        let Some(name) = macro_name(args) else {
            self.report(PreprocessorDiagnostic::MalformedDirective {
                directive: "undef",
                file: origin.to_owned(),
                line: lineno,
            });
            return;
        };
        // removing an undefined name is a no-op
        self.macros.shift_remove(name);
    }

    fn include(&mut self, args: &str, lineno: u32, origin: &Utf8Path, out: &mut String) {
        let Some(target) = include_target(args) else {
            self.report(PreprocessorDiagnostic::MalformedDirective {
                directive: "include",
                file: origin.to_owned(),
                line: lineno,
            });
            return;
        };

        let Some(resolved) = self.resolve_include(target, origin) else {
            self.report(PreprocessorDiagnostic::UnresolvedInclude {
                target: target.to_owned(),
                file: origin.to_owned(),
                line: lineno,
            });
            return;
        };

        if self.include_stack.contains(&resolved) {
            self.report(PreprocessorDiagnostic::CyclicInclude {
                target: resolved,
                file: origin.to_owned(),
                line: lineno,
            });
            return;
        }

        let text = match fs::read_to_string(&resolved) {
            Ok(text) => text,
            Err(_) => {
                self.report(PreprocessorDiagnostic::UnresolvedInclude {
                    target: target.to_owned(),
                    file: origin.to_owned(),
                    line: lineno,
                });
                return;
            }
        };

        self.include_stack.push(resolved.clone());
        self.process_source(&text, &resolved, out);
        self.include_stack.pop();
    }

    /// Resolution order: absolute path as given, then relative to the
    /// including file's directory, then each configured include directory
    /// in the order added. First existing match wins.
    fn resolve_include(&self, target: &str, origin: &Utf8Path) -> Option<Utf8PathBuf> {
        let path = Utf8Path::new(target);
        if path.is_absolute() {
            return path.exists().then(|| path.to_owned());
        }
        if let Some(dir) = origin.parent() {
            let candidate = dir.join(path);
            if candidate.exists() {
                return Some(candidate);
            }
        }
        self.include_dirs.iter().map(|dir| dir.join(path)).find(|candidate| candidate.exists())
    }

    /// Substitute every known macro name occurring as a whole word.
    /// Single pass, left to right; replacement text is not re-scanned.
    fn expand_macros(&self, line: &str) -> String {
        if self.macros.is_empty() {
            return line.to_owned();
        }

        let mut out = String::with_capacity(line.len());
        let mut rest = line;
        while !rest.is_empty() {
            let c = rest.chars().next().unwrap();
            if is_ident_continue(c) {
                let end =
                    rest.find(|c: char| !is_ident_continue(c)).unwrap_or(rest.len());
                let word = &rest[..end];
                // words led by a digit never match a macro name
                if is_ident_start(c) {
                    out.push_str(self.macros.get(word).map(String::as_str).unwrap_or(word));
                } else {
                    out.push_str(word);
                }
                rest = &rest[end..];
            } else {
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
        out
    }

    fn report(&mut self, diagnostic: PreprocessorDiagnostic) {
        log::warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }
}

fn emit(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

fn ends_in_continuation(line: &str) -> bool {
    line.trim_end().ends_with('\\')
}

/// `` `word`` at the start of a line (leading whitespace allowed).
fn directive_name(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix('`')?;
    let end = rest.find(|c: char| !is_ident_continue(c)).unwrap_or(rest.len());
    (end > 0).then(|| &rest[..end])
}

fn macro_name(args: &str) -> Option<&str> {
    let args = args.trim_start();
    let first = args.chars().next()?;
    if !is_ident_start(first) {
        return None;
    }
    let end = args.find(|c: char| !is_ident_continue(c)).unwrap_or(args.len());
    Some(&args[..end])
}

/// `"file"` or `<file>` forms.
fn include_target(args: &str) -> Option<&str> {
    let args = args.trim();
    let (open, close) = match args.chars().next()? {
        '"' => ('"', '"'),
        '<' => ('<', '>'),
        _ => return None,
    };
    let inner = args.strip_prefix(open)?;
    let end = inner.find(close)?;
    (end > 0).then(|| &inner[..end])
}
