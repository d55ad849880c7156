//! Reserved words of the Tarantool SQL dialect.

use ahash::AHashSet;

lazy_static::lazy_static! {
    static ref RESERVED_WORDS: AHashSet<&'static str> = {
        let words = [
            // Names the migration tables of the host use.
            "migration", "batch", "exists",
            "all", "alter", "analyze", "and", "any", "as", "asc", "asensitive",
            "begin", "between", "binary", "by", "call", "case", "char",
            "character", "check", "collate", "column", "commit", "condition",
            "connect", "constraint", "create", "cross", "current",
            "current_date", "current_time", "current_timestamp", "current_user",
            "cursor", "date", "decimal", "declare", "default", "delete",
            "dense_rank", "desc", "describe", "deterministic", "distinct",
            "double", "drop", "each", "else", "elseif", "end", "escape",
            "except", "explain", "fetch", "float", "for", "foreign", "from",
            "function", "get", "grant", "group", "having", "if", "immediate",
            "in", "index", "inner", "inout", "insensitive", "insert", "integer",
            "intersect", "into", "is", "iterate", "join", "leave", "left",
            "like", "localtime", "localtimestamp", "loop", "match", "natural",
            "not", "null", "of", "on", "or", "order", "out", "outer", "over",
            "partition", "pragma", "precision", "primary", "procedure", "range",
            "rank", "reads", "recursive", "references", "reindex", "release",
            "rename", "repeat", "replace", "resignal", "return", "revoke",
            "right", "rollback", "row", "row_number", "rows", "savepoint",
            "select", "sensitive", "set", "signal", "smallint", "specific",
            "sql", "start", "system", "table", "then", "to", "transaction",
            "trigger", "union", "unique", "update", "user", "using", "values",
            "varchar", "view", "when", "whenever", "where", "while", "with",
        ];
        words.into_iter().collect()
    };
}

/// Case-insensitive check against the reserved word set.
#[must_use]
pub fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS.contains(word.to_lowercase().as_str())
}

#[cfg(test)]
mod tests;
