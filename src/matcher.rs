//! C9: a type-directed parser and comparator for the pretty-printed form
//! of values (spec.md §4.7), exposed only to the test harness.
//!
//! Grounded on `plotnik-compiler`'s hand-rolled recursive-descent parsers
//! (dispatch on lookahead, build a tree bottom-up) but working directly
//! over `Peekable<Chars>` rather than a lexed token stream or a green
//! tree, since there is no concrete syntax to preserve here, only a
//! value to extract and compare. Per the design notes' "exceptions as
//! control flow" guidance, every internal step returns `Option`/`bool`;
//! nothing here panics or propagates an error to the caller.

use std::iter::Peekable;
use std::str::Chars;

use indexmap::IndexMap;

use crate::core::Type;

/// A value parsed against a known [`Type`], shaped so record fields are
/// already reordered to the type's canonical (name-sorted) field order.
#[derive(Clone, Debug, PartialEq)]
enum ParsedValue {
    Atom(String),
    List(Vec<ParsedValue>),
    Tuple(Vec<ParsedValue>),
    Record(Vec<(String, ParsedValue)>),
    Ctor { name: String, arg: Option<Box<ParsedValue>> },
}

/// Are `actual` and `expected` equivalent values of type `ty`? Never
/// panics; any parse or comparison failure is `false` (spec.md §4.7 step
/// 5: "false is the conservative answer").
pub fn equivalent(ty: &Type, actual: &str, expected: &str) -> bool {
    let Some(a) = parse_one(ty, actual) else { return false };
    let Some(b) = parse_one(ty, expected) else { return false };
    compare(ty, &a, &b)
}

fn parse_one(ty: &Type, input: &str) -> Option<ParsedValue> {
    let extracted = extract_value(input);
    let normalized = normalize_whitespace(&extracted);
    let mut chars = normalized.chars().peekable();
    let value = parse_value(ty, &mut chars)?;
    skip_ws(&mut chars);
    if chars.next().is_some() {
        return None;
    }
    Some(value)
}

/// Step 1: strip a leading `val <name> = ` and the trailing ` : <type>`.
fn extract_value(input: &str) -> String {
    let s = input.trim();
    let s = match s.strip_prefix("val ") {
        Some(rest) => match rest.find('=') {
            Some(eq) => rest[eq + 1..].trim_start(),
            None => s,
        },
        None => s,
    };
    match find_last_top_level(s, " : ") {
        Some(idx) => &s[..idx],
        None => s,
    }
    .to_string()
}

/// The byte offset of the last occurrence of `pat` at nesting depth zero
/// and outside a string literal.
fn find_last_top_level(s: &str, pat: &str) -> Option<usize> {
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escape = false;
    let mut last = None;
    for (idx, ch) in s.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        if in_string {
            match ch {
                '\\' => escape = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '[' | '(' | '{' => depth += 1,
            ']' | ')' | '}' => depth -= 1,
            _ => {}
        }
        if depth == 0 && s[idx..].starts_with(pat) {
            last = Some(idx);
        }
    }
    last
}

/// Step 2: collapse whitespace runs outside string literals to a single
/// space; string content (escapes included) is copied byte-for-byte.
///
/// The parser below skips whitespace freely between tokens and never
/// relies on adjacency to delimit them (every token ends at an explicit
/// delimiter: `,`, `}`, `]`, `)`, `=`, or a quote), so unlike the
/// original's string-level normalisation this never needs to *insert* a
/// separating space to keep two tokens from fusing.
fn normalize_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    let mut in_string = false;
    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        if c == '"' {
            in_string = true;
            out.push(c);
            continue;
        }
        if c.is_whitespace() {
            while matches!(chars.peek(), Some(w) if w.is_whitespace()) {
                chars.next();
            }
            out.push(' ');
            continue;
        }
        out.push(c);
    }
    out
}

fn skip_ws(chars: &mut Peekable<Chars>) {
    while matches!(chars.peek(), Some(c) if c.is_whitespace()) {
        chars.next();
    }
}

fn expect_char(chars: &mut Peekable<Chars>, expected: char) -> Option<()> {
    if chars.next()? == expected {
        Some(())
    } else {
        None
    }
}

fn parse_ident(chars: &mut Peekable<Chars>) -> Option<String> {
    let mut s = String::new();
    while matches!(chars.peek(), Some(c) if c.is_alphanumeric() || *c == '_') {
        s.push(chars.next().unwrap());
    }
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// A bare token: a number, bool, or constructor name — any run of
/// characters that isn't one of the structural delimiters.
fn read_token(chars: &mut Peekable<Chars>) -> Option<String> {
    let mut out = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_alphanumeric() || matches!(c, '_' | '.' | '-' | '+') {
            out.push(c);
            chars.next();
        } else {
            break;
        }
    }
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

fn elem_type(ty: &Type) -> &Type {
    match ty {
        Type::List(inner) | Type::Bag(inner) => inner,
        other => other,
    }
}

/// Step 3: parse one value against `ty`.
fn parse_value(ty: &Type, chars: &mut Peekable<Chars>) -> Option<ParsedValue> {
    skip_ws(chars);
    match chars.peek()? {
        '[' => parse_list(ty, chars),
        '(' => parse_paren(ty, chars),
        '{' => parse_record(ty, chars),
        '"' => parse_string_atom(chars),
        _ => parse_word_or_ctor(ty, chars),
    }
}

fn parse_list(ty: &Type, chars: &mut Peekable<Chars>) -> Option<ParsedValue> {
    expect_char(chars, '[')?;
    let inner_ty = elem_type(ty);
    let mut items = Vec::new();
    skip_ws(chars);
    if chars.peek() == Some(&']') {
        chars.next();
        return Some(ParsedValue::List(items));
    }
    loop {
        items.push(parse_value(inner_ty, chars)?);
        skip_ws(chars);
        match chars.next()? {
            ',' => skip_ws(chars),
            ']' => break,
            _ => return None,
        }
    }
    Some(ParsedValue::List(items))
}

/// `(…)`: a tuple, or — when `ty` isn't itself a tuple type — a single
/// parenthesised value accepted transparently (spec.md §4.7 step 3).
fn parse_paren(ty: &Type, chars: &mut Peekable<Chars>) -> Option<ParsedValue> {
    expect_char(chars, '(')?;
    skip_ws(chars);
    if chars.peek() == Some(&')') {
        chars.next();
        return Some(ParsedValue::Tuple(vec![]));
    }
    let elem_tys: Vec<Type> = match ty {
        Type::Tuple(tys) => tys.clone(),
        other => vec![other.clone()],
    };
    let mut items = Vec::new();
    loop {
        let item_ty = elem_tys.get(items.len()).unwrap_or_else(|| elem_tys.last().expect("non-empty"));
        items.push(parse_value(item_ty, chars)?);
        skip_ws(chars);
        match chars.next()? {
            ',' => skip_ws(chars),
            ')' => break,
            _ => return None,
        }
    }
    if items.len() == 1 && !matches!(ty, Type::Tuple(_)) {
        Some(items.into_iter().next().expect("len checked above"))
    } else {
        Some(ParsedValue::Tuple(items))
    }
}

/// `{f=v, …}`, reordered into `ty`'s (name-sorted) field order.
fn parse_record(ty: &Type, chars: &mut Peekable<Chars>) -> Option<ParsedValue> {
    expect_char(chars, '{')?;
    let field_tys = ty.as_record()?;
    let mut parsed: IndexMap<String, ParsedValue> = IndexMap::new();
    skip_ws(chars);
    if chars.peek() == Some(&'}') {
        chars.next();
        return Some(ParsedValue::Record(vec![]));
    }
    loop {
        let name = parse_ident(chars)?;
        skip_ws(chars);
        expect_char(chars, '=')?;
        skip_ws(chars);
        let field_ty = &field_tys.iter().find(|(n, _)| *n == name)?.1;
        let value = parse_value(field_ty, chars)?;
        parsed.insert(name, value);
        skip_ws(chars);
        match chars.next()? {
            ',' => skip_ws(chars),
            '}' => break,
            _ => return None,
        }
    }
    let ordered = field_tys
        .iter()
        .map(|(n, _)| parsed.shift_remove(n).map(|v| (n.clone(), v)))
        .collect::<Option<Vec<_>>>()?;
    Some(ParsedValue::Record(ordered))
}

fn parse_string_atom(chars: &mut Peekable<Chars>) -> Option<ParsedValue> {
    expect_char(chars, '"')?;
    let mut s = String::new();
    loop {
        match chars.next()? {
            '\\' => {
                let escaped = chars.next()?;
                s.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    other => other,
                });
            }
            '"' => break,
            c => s.push(c),
        }
    }
    Some(ParsedValue::Atom(s))
}

/// A bare atom, or (when `ty` is a datatype) a constructor name followed
/// by its optional argument.
fn parse_word_or_ctor(ty: &Type, chars: &mut Peekable<Chars>) -> Option<ParsedValue> {
    let word = read_token(chars)?;
    if let Type::Data(dt) = ty {
        let ctor = dt.ctors.iter().find(|c| c.name == word)?;
        return match &ctor.arg {
            None => Some(ParsedValue::Ctor { name: word, arg: None }),
            Some(arg_ty) => {
                skip_ws(chars);
                let arg = parse_value(arg_ty, chars)?;
                Some(ParsedValue::Ctor { name: word, arg: Some(Box::new(arg)) })
            }
        };
    }
    Some(ParsedValue::Atom(word))
}

/// Step 4: type-directed comparison.
fn compare(ty: &Type, a: &ParsedValue, b: &ParsedValue) -> bool {
    match ty {
        Type::List(inner) => compare_list(inner, a, b, false),
        Type::Bag(inner) => compare_list(inner, a, b, true),
        Type::Tuple(tys) => match (a, b) {
            (ParsedValue::Tuple(xs), ParsedValue::Tuple(ys)) => {
                xs.len() == ys.len()
                    && xs.len() == tys.len()
                    && xs.iter().zip(ys).zip(tys).all(|((x, y), t)| compare(t, x, y))
            }
            _ => false,
        },
        Type::Record(fields) => match (a, b) {
            (ParsedValue::Record(xs), ParsedValue::Record(ys)) => {
                xs.len() == ys.len()
                    && xs.len() == fields.len()
                    && xs.iter().zip(ys).zip(fields).all(|((x, y), (_, t))| x.0 == y.0 && compare(t, &x.1, &y.1))
            }
            _ => false,
        },
        Type::Data(dt) => match (a, b) {
            (ParsedValue::Ctor { name: n1, arg: a1 }, ParsedValue::Ctor { name: n2, arg: a2 }) => {
                if n1 != n2 {
                    return false;
                }
                let ctor_arg_ty = dt.ctors.iter().find(|c| &c.name == n1).and_then(|c| c.arg.as_deref());
                match (a1.as_deref(), a2.as_deref(), ctor_arg_ty) {
                    (None, None, _) => true,
                    (Some(x), Some(y), Some(arg_ty)) => compare(arg_ty, x, y),
                    _ => false,
                }
            }
            _ => false,
        },
        Type::Prim(_) | Type::Fun(..) => match (a, b) {
            (ParsedValue::Atom(x), ParsedValue::Atom(y)) => x == y,
            _ => false,
        },
    }
}

/// List/tuple comparison is element-wise in declared order; bag
/// comparison finds, for every element of `a`, exactly one unmatched
/// equivalent element of `b` (spec.md §4.7 step 4).
fn compare_list(elem_ty: &Type, a: &ParsedValue, b: &ParsedValue, as_bag: bool) -> bool {
    let (ParsedValue::List(xs), ParsedValue::List(ys)) = (a, b) else { return false };
    if xs.len() != ys.len() {
        return false;
    }
    if !as_bag {
        return xs.iter().zip(ys).all(|(x, y)| compare(elem_ty, x, y));
    }
    let mut used = vec![false; ys.len()];
    for x in xs {
        let Some(slot) = used.iter().zip(ys).position(|(taken, y)| !taken && compare(elem_ty, x, y)) else {
            return false;
        };
        used[slot] = true;
    }
    true
}

#[cfg(test)]
#[path = "matcher_tests.rs"]
mod tests;
