//! Backend-specific renderings of the metadata queries.
//!
//! Statements are written with `$n` markers and rewritten through
//! [`placeholder`] for the connected backend.

use crate::database::{DatabaseBackend, placeholder};

pub(crate) const SCHEMA_SQL: [&str; 3] = [
    include_str!("sql/create_tokens_table.sql"),
    include_str!("sql/create_tokens_username_index.sql"),
    include_str!("sql/create_tokens_username_namespace_index.sql"),
];

const INSERT_API_KEY_SQL: &str = include_str!("sql/insert_api_key.sql");
const LIST_API_KEYS_SQL: &str = include_str!("sql/list_api_keys.sql");
const GET_API_KEY_SQL: &str = include_str!("sql/get_api_key.sql");
const INVALIDATE_API_KEYS_SQL: &str = include_str!("sql/invalidate_api_keys.sql");

#[derive(Debug, Clone)]
pub(crate) struct Queries {
    pub(crate) insert: String,
    pub(crate) list: String,
    pub(crate) get: String,
    pub(crate) invalidate: String,
}

impl Queries {
    pub(crate) fn for_backend(backend: DatabaseBackend) -> Self {
        Self {
            insert: render(INSERT_API_KEY_SQL, backend),
            list: render(LIST_API_KEYS_SQL, backend),
            get: render(GET_API_KEY_SQL, backend),
            invalidate: render(INVALIDATE_API_KEYS_SQL, backend),
        }
    }
}

/// Replace each `$n` marker with the backend's placeholder for `n`.
fn render(sql: &str, backend: DatabaseBackend) -> String {
    let mut rendered = String::with_capacity(sql.len());
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            rendered.push(c);
            continue;
        }

        let mut index = String::new();
        while let Some(digit) = chars.next_if(char::is_ascii_digit) {
            index.push(digit);
        }

        match index.parse() {
            Ok(index) => rendered.push_str(&placeholder(backend, index)),
            Err(_) => rendered.push(c),
        }
    }

    rendered.trim_end().to_owned()
}
