/// Split semicolon separated SQL into individual statements.
///
/// The split is purely textual: a `;` inside a string literal still splits.
/// A trailing fragment that is only whitespace (the text after the last `;`)
/// is dropped; every other fragment is kept verbatim.
pub fn split_queries(sql: &str) -> Vec<String> {
    let mut queries: Vec<String> = sql.split(';').map(str::to_string).collect();

    if queries.last().is_some_and(|last| last.trim().is_empty()) {
        queries.pop();
    }

    queries
}
