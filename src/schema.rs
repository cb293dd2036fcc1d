use arrow_schema::{DataType, Field, Schema};
use std::fmt::Write;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE_INDENT: &str = "│   ";
const BLANK_INDENT: &str = "    ";

/// Render a table schema as a tree, one line per field, descending into
/// struct, list and map children.
pub fn schema_tree(table: &str, schema: &Schema) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Table: {}", table);

    let fields = schema.fields();
    for (i, field) in fields.iter().enumerate() {
        let is_last = i == fields.len() - 1;
        write_field(&mut out, field, "", is_last);
    }

    out
}

fn write_field(out: &mut String, field: &Field, indent: &str, is_last: bool) {
    let nullable_str = if field.is_nullable() {
        " (nullable)"
    } else {
        ""
    };
    let branch = if is_last { LAST_BRANCH } else { BRANCH };
    let _ = writeln!(
        out,
        "{}{}{}: {}{}",
        indent,
        branch,
        field.name(),
        type_name(field.data_type()),
        nullable_str
    );

    let child_indent = format!("{}{}", indent, if is_last { BLANK_INDENT } else { PIPE_INDENT });
    match field.data_type() {
        DataType::Struct(children) => {
            for (i, child) in children.iter().enumerate() {
                write_field(out, child, &child_indent, i == children.len() - 1);
            }
        }
        DataType::List(child) | DataType::LargeList(child) | DataType::Map(child, _) => {
            write_field(out, child, &child_indent, true);
        }
        _ => {}
    }
}

fn type_name(data_type: &DataType) -> String {
    match data_type {
        DataType::Struct(_) => "STRUCT".to_string(),
        DataType::List(_) => "LIST".to_string(),
        DataType::LargeList(_) => "LARGE_LIST".to_string(),
        DataType::Map(_, sorted) => format!("MAP({})", if *sorted { "sorted" } else { "unsorted" }),
        other => other.to_string().to_uppercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_flat_schema() {
        let schema = Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("name", DataType::Utf8, true),
        ]);
        let tree = schema_tree("people", &schema);
        let lines: Vec<&str> = tree.lines().collect();
        assert_eq!(
            lines,
            vec!["Table: people", "├── id: INT64", "└── name: UTF8 (nullable)"]
        );
    }

    #[test]
    fn test_nested_schema() {
        let coordinates = DataType::Struct(
            vec![
                Arc::new(Field::new("lat", DataType::Float64, false)),
                Arc::new(Field::new("lng", DataType::Float64, false)),
            ]
            .into(),
        );
        let schema = Schema::new(vec![
            Field::new("location", coordinates, true),
            Field::new(
                "tags",
                DataType::List(Arc::new(Field::new("item", DataType::Utf8, true))),
                true,
            ),
        ]);

        let tree = schema_tree("places", &schema);
        let lines: Vec<&str> = tree.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Table: places",
                "├── location: STRUCT (nullable)",
                "│   ├── lat: FLOAT64",
                "│   └── lng: FLOAT64",
                "└── tags: LIST (nullable)",
                "    └── item: UTF8 (nullable)",
            ]
        );
    }
}
