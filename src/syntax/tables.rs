//! Static token tables for jq
//!
//! The fixed enumerations the classifier matches against: keywords,
//! operators, constants, builtin functions and `@` format strings. These are
//! string data only; membership is the whole contract.

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Reserved words of the jq language.
pub const KEYWORDS: &[&str] = &[
    "def", "as", "label", "module", "import", "include", "if", "then", "elif",
    "else", "end", "try", "catch", "reduce", "foreach",
];

/// Operator tokens, including the update-assignment family.
pub const OPERATORS: &[&str] = &[
    ".", "..", "|", "?", "//", "?//", "=", "==", "!=", "<", "<=", ">", ">=",
    "+", "-", "*", "/", "%", "+=", "-=", "*=", "/=", "%=", "//=", "|=", "and",
    "or", "not",
];

/// Literal constants.
pub const CONSTANTS: &[&str] = &["true", "false", "null"];

/// `@` format strings accepted by string interpolation and conversion.
pub const FORMATS: &[&str] = &[
    "@text", "@json", "@html", "@uri", "@csv", "@tsv", "@sh", "@base32",
    "@base32d", "@base64", "@base64d",
];

/// Builtin functions from the jq standard library.
///
/// Used purely as string data: an identifier in call position that appears
/// here is displayed as a builtin rather than a user function.
pub const BUILTIN_FUNCTIONS: &[&str] = &[
    "length", "utf8bytelength", "not", "empty", "error", "input", "inputs",
    "debug", "stderr", "type", "infinite", "nan", "isinfinite", "isnan",
    "isnormal", "keys", "keys_unsorted", "values", "has", "in", "contains",
    "inside", "path", "paths", "leaf_paths", "getpath", "setpath", "delpaths",
    "to_entries", "from_entries", "with_entries", "select", "arrays",
    "objects", "iterables", "booleans", "numbers", "strings", "nulls",
    "scalars", "recurse", "env", "builtins", "add", "any", "all", "flatten",
    "range", "floor", "sqrt", "pow", "log", "exp", "log2", "log10", "min",
    "max", "min_by", "max_by", "sort", "sort_by", "group_by", "unique",
    "unique_by", "reverse", "until", "repeat", "limit", "first", "last",
    "nth", "startswith", "endswith", "ltrimstr", "rtrimstr", "explode",
    "implode", "split", "splits", "join", "ascii_downcase", "ascii_upcase",
    "ascii", "test", "match", "capture", "scan", "sub", "gsub", "tostring",
    "tonumber", "tojson", "fromjson", "tostream", "fromstream",
    "truncate_stream", "input_line_number", "halt", "halt_error", "map",
    "map_values", "del", "walk", "transpose", "combinations", "now",
    "localtime", "gmtime", "mktime", "strftime", "strptime", "todate",
    "fromdate", "date", "isvalid",
];

static KEYWORD_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| KEYWORDS.iter().copied().collect());
static OPERATOR_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| OPERATORS.iter().copied().collect());
static CONSTANT_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| CONSTANTS.iter().copied().collect());
static FORMAT_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| FORMATS.iter().copied().collect());
static BUILTIN_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| BUILTIN_FUNCTIONS.iter().copied().collect());

/// Whether the token is a reserved word.
pub fn is_keyword(token: &str) -> bool {
    KEYWORD_SET.contains(token)
}

/// Whether the token is an operator.
pub fn is_operator(token: &str) -> bool {
    OPERATOR_SET.contains(token)
}

/// Whether the token is a literal constant.
pub fn is_constant(token: &str) -> bool {
    CONSTANT_SET.contains(token)
}

/// Whether the token is an `@` format string.
pub fn is_format(token: &str) -> bool {
    FORMAT_SET.contains(token)
}

/// Whether the name is a jq builtin function.
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_SET.contains(name)
}
