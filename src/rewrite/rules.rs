//! Per-line pattern matching and conditional-block generation.

use super::{RewritePolicy, SkipReason};
use crate::constants::{get_assign_re, get_decl_re, get_return_re};
use smallvec::SmallVec;

/// Replacement block for a single rewritten line. Blocks are at most seven
/// lines, so they fit on the stack.
pub(super) type Block = SmallVec<[String; 8]>;

/// Outcome of inspecting one line.
pub(super) enum LineRewrite {
    /// The line was expanded into an explicit conditional block.
    Replaced(Block),
    /// The line carries the token but no safe rule matched.
    Unresolved(SkipReason),
    /// The line does not contain the coalescing token.
    Untouched,
}

/// Stateful line rules. The only state is the sequence number used to name
/// hoisted temporaries, which is scoped to one source unit.
pub(super) struct LineRules {
    policy: RewritePolicy,
    hoist_seq: usize,
}

/// The statement form a matched line belongs to, carrying enough of the
/// parse to re-emit the statement around a hoisted temporary.
enum Form<'a> {
    Declaration {
        keyword: &'a str,
        name: &'a str,
        annotation: Option<&'a str>,
    },
    Return,
    Assignment {
        target: &'a str,
    },
}

impl LineRules {
    pub(super) fn new(policy: RewritePolicy) -> Self {
        Self {
            policy,
            hoist_seq: 0,
        }
    }

    /// Applies the rules to a single line, first match wins.
    pub(super) fn rewrite_line(&mut self, line: &str) -> LineRewrite {
        let (content, eol) = match line.strip_suffix('\r') {
            Some(stripped) => (stripped, "\r"),
            None => (line, ""),
        };

        let tokens = scan_tokens(content);
        if tokens.is_empty() {
            return LineRewrite::Untouched;
        }
        if tokens.len() > 1 {
            return LineRewrite::Unresolved(SkipReason::NestedCoalescing);
        }

        let indent_len = content.len() - content.trim_start().len();
        let indent = &content[..indent_len];
        let body = &content[indent_len..];
        let token = tokens[0] - indent_len;

        // Declaration form: let|var <name> [: <type>] = <lhs> ?? <rhs>
        if let Some(caps) = get_decl_re().captures(body) {
            if let Some(expr) = caps.name("expr") {
                if token >= expr.start() {
                    let form = Form::Declaration {
                        keyword: &caps["kw"],
                        name: &caps["name"],
                        annotation: caps.name("ty").map(|m| m.as_str().trim()),
                    };
                    return self.expand(indent, eol, &form, expr.as_str(), token - expr.start());
                }
            }
        }

        // Return form: return <lhs> ?? <rhs>
        if let Some(caps) = get_return_re().captures(body) {
            if let Some(expr) = caps.name("expr") {
                if token >= expr.start() {
                    return self.expand(indent, eol, &Form::Return, expr.as_str(), token - expr.start());
                }
            }
        }

        // Bare assignment form: <target> = <lhs> ?? <rhs>
        if let Some(caps) = get_assign_re().captures(body) {
            if let Some(expr) = caps.name("expr") {
                if token >= expr.start() {
                    let form = Form::Assignment {
                        target: &caps["target"],
                    };
                    return self.expand(indent, eol, &form, expr.as_str(), token - expr.start());
                }
            }
        }

        LineRewrite::Unresolved(SkipReason::NoRecognizableTarget)
    }

    /// Splits `expr` at the token and emits the replacement block for `form`.
    fn expand(
        &mut self,
        indent: &str,
        eol: &str,
        form: &Form<'_>,
        expr: &str,
        token: usize,
    ) -> LineRewrite {
        let lhs = expr[..token].trim();
        let rhs = strip_line_comment(expr[token + 2..].trim_start());
        if lhs.is_empty() || rhs.is_empty() {
            return LineRewrite::Unresolved(SkipReason::NoRecognizableTarget);
        }

        // The regexes split at the first `=`, so a comparison (`==`) leaves
        // its second `=` at the head of the expression. Not an assignment.
        if lhs.starts_with('=') {
            return LineRewrite::Unresolved(SkipReason::NoRecognizableTarget);
        }

        // A token behind an unclosed paren lives in a call-argument list.
        if lhs.matches('(').count() > lhs.matches(')').count() {
            return LineRewrite::Unresolved(SkipReason::InsideCallArguments);
        }

        // Two or more `?` markers on the left is a deep chain.
        if lhs.matches('?').count() >= 2 {
            return match self.policy {
                RewritePolicy::Conditional => {
                    LineRewrite::Unresolved(SkipReason::DeepOptionalChain)
                }
                RewritePolicy::Hoist => {
                    let block = self.hoist_block(indent, eol, form, lhs, rhs);
                    LineRewrite::Replaced(block)
                }
            };
        }

        let mut block = Block::new();
        let push = |block: &mut Block, text: String| block.push(format!("{text}{eol}"));

        match form {
            Form::Declaration {
                keyword,
                name,
                annotation,
            } => {
                let temp = format!("temp{}", capitalize(name));
                let decl = match annotation {
                    Some(ty) => format!("{indent}{keyword} {name}: {ty}"),
                    None => format!("{indent}{keyword} {name}"),
                };
                push(&mut block, decl);
                push(&mut block, format!("{indent}if let {temp} = {lhs} {{"));
                push(&mut block, format!("{indent}    {name} = {temp}"));
                push(&mut block, format!("{indent}}} else {{"));
                push(&mut block, format!("{indent}    {name} = {rhs}"));
                push(&mut block, format!("{indent}}}"));
            }
            Form::Return => {
                push(&mut block, format!("{indent}if let tempValue = {lhs} {{"));
                push(&mut block, format!("{indent}    return tempValue"));
                push(&mut block, format!("{indent}}}"));
                push(&mut block, format!("{indent}return {rhs}"));
            }
            Form::Assignment { target } => {
                push(&mut block, format!("{indent}if let tempValue = {lhs} {{"));
                push(&mut block, format!("{indent}    {target} = tempValue"));
                push(&mut block, format!("{indent}}} else {{"));
                push(&mut block, format!("{indent}    {target} = {rhs}"));
                push(&mut block, format!("{indent}}}"));
            }
        }

        LineRewrite::Replaced(block)
    }

    /// Hoists a deep-chained left-hand side into a fresh temporary, then
    /// re-emits the original statement reading from the temporary.
    fn hoist_block(
        &mut self,
        indent: &str,
        eol: &str,
        form: &Form<'_>,
        lhs: &str,
        rhs: &str,
    ) -> Block {
        let temp = format!("tempValue{}", self.hoist_seq);
        self.hoist_seq += 1;

        let mut block = Block::new();
        let push = |block: &mut Block, text: String| block.push(format!("{text}{eol}"));

        push(&mut block, format!("{indent}let {temp}"));
        push(&mut block, format!("{indent}if let temp = {lhs} {{"));
        push(&mut block, format!("{indent}    {temp} = temp"));
        push(&mut block, format!("{indent}}} else {{"));
        push(&mut block, format!("{indent}    {temp} = {rhs}"));
        push(&mut block, format!("{indent}}}"));

        let statement = match form {
            Form::Declaration {
                keyword,
                name,
                annotation,
            } => match annotation {
                Some(ty) => format!("{indent}{keyword} {name}: {ty} = {temp}"),
                None => format!("{indent}{keyword} {name} = {temp}"),
            },
            Form::Return => format!("{indent}return {temp}"),
            Form::Assignment { target } => format!("{indent}{target} = {temp}"),
        };
        push(&mut block, statement);

        block
    }
}

/// Finds the byte offsets of every `??` outside string literals. Scanning
/// stops at an unquoted `//`; tokens in trailing comments are not code.
fn scan_tokens(content: &str) -> SmallVec<[usize; 2]> {
    let bytes = content.as_bytes();
    let mut out = SmallVec::new();
    let mut in_string = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if in_string => {
                i += 2;
                continue;
            }
            b'"' => in_string = !in_string,
            b'/' if !in_string && bytes.get(i + 1) == Some(&b'/') => break,
            b'?' if !in_string && bytes.get(i + 1) == Some(&b'?') => {
                out.push(i);
                i += 2;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    out
}

/// Strips a trailing `//` line comment, ignoring `//` inside string literals.
/// Comments are discourse, not semantics; they must not leak into generated
/// assignments.
fn strip_line_comment(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut in_string = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if in_string => {
                i += 2;
                continue;
            }
            b'"' => in_string = !in_string,
            b'/' if !in_string && bytes.get(i + 1) == Some(&b'/') => {
                return s[..i].trim_end();
            }
            _ => {}
        }
        i += 1;
    }
    s.trim_end()
}

/// Upper-cases the first character: `name` -> `Name`.
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
