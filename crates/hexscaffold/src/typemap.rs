//! SQL ↔ Go type mapping.
//!
//! The forward direction is total: any source type string maps to some
//! [`TargetType`], falling back to `string`. The reverse direction is a
//! best-effort heuristic used only by the migration synthesizer when a
//! column carries no source type.

use serde::{Deserialize, Serialize};

/// Go type a column maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetType {
    Int64,
    Float64,
    Bool,
    String,
    Time,
    /// JSON and JSONB columns.
    StringList,
}

impl TargetType {
    /// Go type as written in generated source.
    pub fn go_type(&self) -> &'static str {
        match self {
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Time => "time.Time",
            Self::StringList => "[]string",
        }
    }

    /// `reflect.Kind` used by the REST query-parameter descriptors.
    pub fn reflect_kind(&self) -> &'static str {
        match self {
            Self::Int64 => "reflect.Int64",
            Self::Float64 => "reflect.Float64",
            Self::Bool => "reflect.Bool",
            Self::String | Self::Time | Self::StringList => "reflect.String",
        }
    }

    /// Whether a field of this type needs `import "time"`.
    pub fn needs_time_import(&self) -> bool {
        matches!(self, Self::Time)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Int64)
    }
}

/// Result of mapping one column forward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub target: TargetType,
    /// Full GORM struct tag, e.g. `gorm:"column:name;not null"`.
    pub persistence_tag: String,
    /// Full JSON struct tag, e.g. `json:"name,omitempty"`.
    pub serialization_tag: String,
}

/// Leading alphabetic run of the uppercased type: `VARCHAR(255)` → `VARCHAR`.
pub fn base_type(source_type: &str) -> String {
    source_type
        .trim()
        .to_uppercase()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect()
}

/// Resolve a source type to its target type. Unknown types become `string`.
pub fn target_type(source_type: &str) -> TargetType {
    match base_type(source_type).as_str() {
        "INT" | "INTEGER" | "SMALLINT" | "BIGINT" | "SERIAL" | "SMALLSERIAL" | "BIGSERIAL" => {
            TargetType::Int64
        }
        "VARCHAR" | "TEXT" | "CHAR" | "CHARACTER" | "UUID" => TargetType::String,
        "JSON" | "JSONB" => TargetType::StringList,
        "BOOLEAN" | "BOOL" => TargetType::Bool,
        "TIMESTAMP" | "TIMESTAMPTZ" | "DATETIME" | "DATE" | "TIME" => TargetType::Time,
        "DECIMAL" | "NUMERIC" | "FLOAT" | "REAL" | "DOUBLE" => TargetType::Float64,
        _ => TargetType::String,
    }
}

/// Map a column forward to its Go type and struct tags.
pub fn map_forward(
    source_type: &str,
    column_name: &str,
    is_primary_key: bool,
    is_nullable: bool,
) -> ColumnMapping {
    let target = target_type(source_type);

    let mut gorm = vec![format!("column:{}", column_name.to_lowercase())];
    if is_primary_key {
        gorm.push("primarykey".to_string());
    }
    if !is_nullable {
        gorm.push("not null".to_string());
    }
    let upper = source_type.to_uppercase();
    if upper.contains("JSONB") {
        gorm.push("type:jsonb".to_string());
        gorm.push("serializer:json".to_string());
    } else if upper.contains("JSON") {
        gorm.push("type:json".to_string());
        gorm.push("serializer:json".to_string());
    }

    ColumnMapping {
        target,
        persistence_tag: format!("gorm:\"{}\"", gorm.join(";")),
        serialization_tag: format!("json:\"{column_name},omitempty\""),
    }
}

/// One entry of the reverse-mapping rule list.
pub struct ReverseRule {
    pub name: &'static str,
    pub applies: fn(TargetType, &str) -> bool,
    pub sql_type: &'static str,
}

const COUNT_HINTS: &[&str] = &["count", "mins", "idx", "battery", "qty", "quantity"];
const MEASUREMENT_HINTS: &[&str] = &[
    "distance",
    "calories",
    "threshold",
    "ratio",
    "_rate",
    "score",
    "weight",
    "amount",
];

static REVERSE_RULES: &[ReverseRule] = &[
    ReverseRule {
        name: "identity",
        applies: |_, name| name == "id",
        sql_type: "BIGSERIAL",
    },
    ReverseRule {
        name: "foreign_key",
        applies: |target, name| name.ends_with("_id") && target.is_integer(),
        sql_type: "BIGINT",
    },
    ReverseRule {
        name: "audit_timestamp",
        applies: |_, name| matches!(name, "created_at" | "updated_at" | "deleted_at"),
        sql_type: "TIMESTAMPTZ",
    },
    ReverseRule {
        name: "soft_delete_flag",
        applies: |_, name| name == "is_deleted",
        sql_type: "BOOLEAN",
    },
    ReverseRule {
        name: "epoch_timestamp",
        applies: |target, name| {
            target != TargetType::Time
                && (name.contains("timestamp") || name.ends_with("_ts") || name == "key_time")
        },
        sql_type: "BIGINT",
    },
    ReverseRule {
        name: "structured",
        applies: |target, _| target == TargetType::StringList,
        sql_type: "JSONB",
    },
    ReverseRule {
        name: "count",
        applies: |target, name| {
            target == TargetType::String && COUNT_HINTS.iter().any(|h| name.contains(h))
        },
        sql_type: "INTEGER",
    },
    ReverseRule {
        name: "measurement",
        applies: |target, name| {
            target == TargetType::String && MEASUREMENT_HINTS.iter().any(|h| name.contains(h))
        },
        sql_type: "DOUBLE PRECISION",
    },
];

/// The ordered reverse-mapping rules; the first rule that applies wins.
pub fn reverse_rules() -> &'static [ReverseRule] {
    REVERSE_RULES
}

/// SQL type used when no rule applies.
pub fn default_sql_type(target: TargetType) -> &'static str {
    match target {
        TargetType::Int64 => "BIGINT",
        TargetType::Float64 => "DOUBLE PRECISION",
        TargetType::Bool => "BOOLEAN",
        TargetType::Time => "TIMESTAMPTZ",
        TargetType::String => "TEXT",
        TargetType::StringList => "JSONB",
    }
}

/// Best-effort reverse mapping from a Go type back to a SQL type.
///
/// Does not invert [`map_forward`]: `VARCHAR(64)` maps to `string`, which
/// maps back to `TEXT`.
pub fn map_reverse(target: TargetType, column_name: &str) -> &'static str {
    let name = column_name.to_lowercase();
    REVERSE_RULES
        .iter()
        .find(|rule| (rule.applies)(target, &name))
        .map(|rule| rule.sql_type)
        .unwrap_or_else(|| default_sql_type(target))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str) -> &'static ReverseRule {
        reverse_rules().iter().find(|r| r.name == name).unwrap()
    }

    #[test]
    fn test_base_type_strips_qualifiers() {
        assert_eq!(base_type("varchar(255)"), "VARCHAR");
        assert_eq!(base_type("NUMERIC(10,2)"), "NUMERIC");
        assert_eq!(base_type("DOUBLE PRECISION"), "DOUBLE");
        assert_eq!(base_type("int8"), "INT");
        assert_eq!(base_type("(weird)"), "");
    }

    #[test]
    fn test_target_families() {
        assert_eq!(target_type("BIGSERIAL"), TargetType::Int64);
        assert_eq!(target_type("integer"), TargetType::Int64);
        assert_eq!(target_type("VARCHAR(100)"), TargetType::String);
        assert_eq!(target_type("UUID"), TargetType::String);
        assert_eq!(target_type("JSONB"), TargetType::StringList);
        assert_eq!(target_type("bool"), TargetType::Bool);
        assert_eq!(target_type("TIMESTAMPTZ"), TargetType::Time);
        assert_eq!(target_type("DATE"), TargetType::Time);
        assert_eq!(target_type("DOUBLE PRECISION"), TargetType::Float64);
        assert_eq!(target_type("DECIMAL(10,2)"), TargetType::Float64);
    }

    #[test]
    fn test_map_forward_is_total() {
        for input in ["", " ", "???", "GEOGRAPHY(POINT)", "ÜBER", "123", "x"] {
            let mapping = map_forward(input, "col", false, true);
            assert_eq!(mapping.target, TargetType::String, "input {input:?}");
        }
    }

    #[test]
    fn test_persistence_tag() {
        let m = map_forward("BIGSERIAL", "ID", true, false);
        assert_eq!(m.persistence_tag, r#"gorm:"column:id;primarykey;not null""#);

        let m = map_forward("TEXT", "name", false, true);
        assert_eq!(m.persistence_tag, r#"gorm:"column:name""#);
    }

    #[test]
    fn test_json_tags() {
        let m = map_forward("JSONB", "payload", false, true);
        assert_eq!(
            m.persistence_tag,
            r#"gorm:"column:payload;type:jsonb;serializer:json""#
        );
        let m = map_forward("json", "payload", false, true);
        assert_eq!(
            m.persistence_tag,
            r#"gorm:"column:payload;type:json;serializer:json""#
        );
    }

    #[test]
    fn test_serialization_tag_keeps_original_name() {
        let m = map_forward("TEXT", "userName", false, true);
        assert_eq!(m.serialization_tag, r#"json:"userName,omitempty""#);
        assert!(m.persistence_tag.contains("column:username"));
    }

    #[test]
    fn test_reverse_rule_priority() {
        // identity beats foreign_key and default
        assert_eq!(map_reverse(TargetType::Int64, "id"), "BIGSERIAL");
        assert_eq!(map_reverse(TargetType::Int64, "account_id"), "BIGINT");
        // a string `_id` column is not a foreign key
        assert_eq!(map_reverse(TargetType::String, "external_id"), "TEXT");
        assert_eq!(map_reverse(TargetType::Time, "created_at"), "TIMESTAMPTZ");
        assert_eq!(map_reverse(TargetType::Int64, "event_timestamp"), "BIGINT");
        assert_eq!(map_reverse(TargetType::Time, "event_timestamp"), "TIMESTAMPTZ");
        assert_eq!(map_reverse(TargetType::StringList, "tags"), "JSONB");
        assert_eq!(map_reverse(TargetType::String, "step_count"), "INTEGER");
        assert_eq!(map_reverse(TargetType::String, "distance"), "DOUBLE PRECISION");
        assert_eq!(map_reverse(TargetType::String, "title"), "TEXT");
    }

    #[test]
    fn test_reverse_rules_individually() {
        assert!((rule("identity").applies)(TargetType::String, "id"));
        assert!(!(rule("foreign_key").applies)(TargetType::String, "user_id"));
        assert!((rule("foreign_key").applies)(TargetType::Int64, "user_id"));
        assert!((rule("soft_delete_flag").applies)(TargetType::Bool, "is_deleted"));
        assert!(!(rule("count").applies)(TargetType::Int64, "step_count"));
        assert!((rule("measurement").applies)(TargetType::String, "heart_rate"));
    }

    #[test]
    fn test_reverse_defaults() {
        assert_eq!(map_reverse(TargetType::Float64, "price"), "DOUBLE PRECISION");
        assert_eq!(map_reverse(TargetType::Bool, "active"), "BOOLEAN");
        assert_eq!(map_reverse(TargetType::Int64, "total"), "BIGINT");
    }

    #[test]
    fn test_reverse_is_not_an_inverse() {
        let forward = map_forward("VARCHAR(64)", "title", false, true);
        assert_eq!(map_reverse(forward.target, "title"), "TEXT");
    }
}
