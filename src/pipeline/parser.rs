//! JSON pipeline front-end
//!
//! The surrounding API layer hands aggregations over as a Mongo-style JSON
//! array of stage documents. This parser lowers that form into the typed
//! [`Pipeline`] vocabulary. Anything outside the supported vocabulary turns
//! into a [`Diagnostic`] and is dropped; parsing itself never fails.
//!
//! Accepted shapes:
//!
//! ```json
//! [
//!   {"$match": {"domainId": {"$in": ["a"]}, "$or": [{"source": {"$ne": null}}]}},
//!   {"$group": {"_id": {"day": {"$dayOfMonth": "$created"}}, "count": {"$sum": 1}}},
//!   {"$project": {"duration": {"$subtract": ["$updated", "$created"]}}},
//!   {"$sort": {"count": -1}},
//!   {"$limit": 25},
//!   {"$count": "count"}
//! ]
//! ```

use serde_json::Value;

use crate::executor::Diagnostic;

use super::group::{Accumulator, AccumulatorKind, GroupKey, GroupSpec};
use super::predicate::{Clause, MatchOp, MatchSpec};
use super::project::{ProjectField, ProjectOp, ProjectSpec};
use super::sort::{SortDirection, SortSpec};
use super::stage::{Pipeline, Stage};

/// Parses a Mongo-style JSON pipeline array into typed stages.
///
/// Returns the stages that could be understood plus diagnostics for
/// everything that could not. Stage order is preserved.
pub fn parse_pipeline(value: &Value) -> (Pipeline, Vec<Diagnostic>) {
    let mut pipeline = Pipeline::new();
    let mut diagnostics = Vec::new();

    let stages = match value.as_array() {
        Some(stages) => stages,
        None => {
            diagnostics.push(Diagnostic::MalformedStage {
                stage: "pipeline",
                detail: "expected a JSON array of stage documents".to_string(),
            });
            return (pipeline, diagnostics);
        }
    };

    for stage_doc in stages {
        let obj = match stage_doc.as_object() {
            Some(obj) => obj,
            None => {
                diagnostics.push(Diagnostic::MalformedStage {
                    stage: "pipeline",
                    detail: format!("stage document is not an object: {stage_doc}"),
                });
                continue;
            }
        };

        for (name, body) in obj {
            let stage = match name.as_str() {
                "$match" => parse_match(body, &mut diagnostics),
                "$group" => parse_group(body, &mut diagnostics),
                "$project" => parse_project(body, &mut diagnostics),
                "$sort" => parse_sort(body, &mut diagnostics),
                "$limit" => parse_limit(body, &mut diagnostics),
                "$count" => Some(Stage::Count),
                other => {
                    diagnostics.push(Diagnostic::UnsupportedStage {
                        name: other.to_string(),
                    });
                    None
                }
            };
            if let Some(stage) = stage {
                pipeline.push(stage);
            }
        }
    }

    (pipeline, diagnostics)
}

fn parse_match(body: &Value, diagnostics: &mut Vec<Diagnostic>) -> Option<Stage> {
    let obj = match body.as_object() {
        Some(obj) => obj,
        None => {
            diagnostics.push(Diagnostic::MalformedStage {
                stage: "$match",
                detail: "expected an object of field clauses".to_string(),
            });
            return None;
        }
    };

    let mut spec = MatchSpec::new();
    for (field, clause_body) in obj {
        if field == "$or" {
            parse_or_block(clause_body, &mut spec, diagnostics);
            continue;
        }
        let clauses = parse_field_clauses("$match", field, clause_body, diagnostics);
        spec.clauses.extend(clauses);
    }
    Some(Stage::Match(spec))
}

/// `$or` holds an array of single-clause `{field: {op: value}}` documents.
fn parse_or_block(body: &Value, spec: &mut MatchSpec, diagnostics: &mut Vec<Diagnostic>) {
    let items = match body.as_array() {
        Some(items) => items,
        None => {
            diagnostics.push(Diagnostic::MalformedStage {
                stage: "$match",
                detail: "$or expects an array of single-field clauses".to_string(),
            });
            return;
        }
    };

    for item in items {
        let Some(obj) = item.as_object() else {
            diagnostics.push(Diagnostic::MalformedStage {
                stage: "$match",
                detail: format!("$or entry is not an object: {item}"),
            });
            continue;
        };
        for (field, clause_body) in obj {
            let clauses = parse_field_clauses("$match", field, clause_body, diagnostics);
            spec.any_of.extend(clauses);
        }
    }
}

fn parse_field_clauses(
    stage: &'static str,
    field: &str,
    body: &Value,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<Clause> {
    let obj = match body.as_object() {
        Some(obj) => obj,
        None => {
            // Bare `{field: value}` equality is outside the vocabulary.
            diagnostics.push(Diagnostic::UnsupportedOperator {
                stage,
                field: field.to_string(),
                operator: "$eq".to_string(),
            });
            return Vec::new();
        }
    };

    let mut clauses = Vec::new();
    for (op_name, operand) in obj {
        let op = match op_name.as_str() {
            "$in" => match operand.as_array() {
                Some(set) => Some(MatchOp::In(set.clone())),
                None => {
                    diagnostics.push(Diagnostic::MalformedStage {
                        stage,
                        detail: format!("$in on '{field}' expects an array"),
                    });
                    None
                }
            },
            "$ne" => Some(MatchOp::NotEqual(operand.clone())),
            "$gte" => Some(MatchOp::GreaterOrEqual(operand.clone())),
            "$lt" => Some(MatchOp::LessThan(operand.clone())),
            "$exists" => Some(MatchOp::Exists),
            other => {
                diagnostics.push(Diagnostic::UnsupportedOperator {
                    stage,
                    field: field.to_string(),
                    operator: other.to_string(),
                });
                None
            }
        };
        if let Some(op) = op {
            clauses.push(Clause {
                field: field.to_string(),
                op,
            });
        }
    }
    clauses
}

fn parse_group(body: &Value, diagnostics: &mut Vec<Diagnostic>) -> Option<Stage> {
    let obj = match body.as_object() {
        Some(obj) => obj,
        None => {
            diagnostics.push(Diagnostic::MalformedStage {
                stage: "$group",
                detail: "expected an object".to_string(),
            });
            return None;
        }
    };

    // A $group without _id has nothing to partition on: empty effect.
    let Some(id_body) = obj.get("_id") else {
        diagnostics.push(Diagnostic::MalformedStage {
            stage: "$group",
            detail: "missing _id".to_string(),
        });
        return None;
    };

    let mut spec = GroupSpec::new();

    // Key names carry the grouping; the `"$field"` / `{"$dayOfMonth": …}`
    // values are decoration the source system ignored too.
    if let Some(id_obj) = id_body.as_object() {
        for name in id_obj.keys() {
            spec.keys.push(GroupKey::from_name(name));
        }
    }

    for (output, acc_body) in obj {
        if output == "_id" {
            continue;
        }
        let Some(acc_obj) = acc_body.as_object() else {
            diagnostics.push(Diagnostic::MalformedStage {
                stage: "$group",
                detail: format!("accumulator '{output}' is not an object"),
            });
            continue;
        };
        for op_name in acc_obj.keys() {
            let kind = match op_name.as_str() {
                "$sum" => Some(AccumulatorKind::Sum),
                "$avg" => Some(AccumulatorKind::Avg),
                other => {
                    diagnostics.push(Diagnostic::UnsupportedOperator {
                        stage: "$group",
                        field: output.to_string(),
                        operator: other.to_string(),
                    });
                    None
                }
            };
            if let Some(kind) = kind {
                spec.accumulators.push(Accumulator {
                    output: output.to_string(),
                    kind,
                });
            }
        }
    }

    Some(Stage::Group(spec))
}

fn parse_project(body: &Value, diagnostics: &mut Vec<Diagnostic>) -> Option<Stage> {
    let obj = match body.as_object() {
        Some(obj) => obj,
        None => {
            diagnostics.push(Diagnostic::MalformedStage {
                stage: "$project",
                detail: "expected an object".to_string(),
            });
            return None;
        }
    };

    let mut spec = ProjectSpec::new();
    for (field, expr) in obj {
        match field.as_str() {
            "duration" => {
                if let Some(op) = parse_duration_expr(expr, diagnostics) {
                    spec.fields.push(ProjectField {
                        field: field.to_string(),
                        op,
                    });
                }
            }
            "created" => {
                spec.fields.push(ProjectField {
                    field: field.to_string(),
                    op: ProjectOp::Keep,
                });
            }
            other => {
                diagnostics.push(Diagnostic::UnsupportedProjection {
                    field: other.to_string(),
                });
            }
        }
    }
    Some(Stage::Project(spec))
}

fn parse_duration_expr(expr: &Value, diagnostics: &mut Vec<Diagnostic>) -> Option<ProjectOp> {
    let obj = match expr.as_object() {
        Some(obj) => obj,
        None => {
            diagnostics.push(Diagnostic::MalformedStage {
                stage: "$project",
                detail: "duration expression is not an object".to_string(),
            });
            return None;
        }
    };

    for (op_name, operand) in obj {
        match op_name.as_str() {
            "$subtract" => {
                let fields: Option<Vec<&str>> = operand
                    .as_array()
                    .filter(|a| a.len() == 2)
                    .map(|a| a.iter().filter_map(Value::as_str).collect());
                match fields.as_deref() {
                    Some([minuend, subtrahend]) => {
                        return Some(ProjectOp::Subtract {
                            minuend: strip_ref(minuend),
                            subtrahend: strip_ref(subtrahend),
                        });
                    }
                    _ => {
                        diagnostics.push(Diagnostic::MalformedStage {
                            stage: "$project",
                            detail: "$subtract expects two field references".to_string(),
                        });
                    }
                }
            }
            "$floor" => {
                let bounds: Option<Vec<i64>> = operand
                    .as_array()
                    .filter(|a| a.len() == 2)
                    .map(|a| a.iter().filter_map(Value::as_i64).collect());
                match bounds.as_deref() {
                    Some([lower, upper]) => {
                        return Some(ProjectOp::ConditionalFloor {
                            lower: *lower,
                            upper: *upper,
                        });
                    }
                    _ => {
                        diagnostics.push(Diagnostic::MalformedStage {
                            stage: "$project",
                            detail: "$floor expects [lower, upper] bounds".to_string(),
                        });
                    }
                }
            }
            other => {
                diagnostics.push(Diagnostic::UnsupportedOperator {
                    stage: "$project",
                    field: "duration".to_string(),
                    operator: other.to_string(),
                });
            }
        }
    }
    None
}

/// Strips the `$` field-reference prefix (`"$created"` → `created`).
fn strip_ref(reference: &str) -> String {
    reference.strip_prefix('$').unwrap_or(reference).to_string()
}

fn parse_sort(body: &Value, diagnostics: &mut Vec<Diagnostic>) -> Option<Stage> {
    let obj = match body.as_object() {
        Some(obj) => obj,
        None => {
            diagnostics.push(Diagnostic::MalformedStage {
                stage: "$sort",
                detail: "expected an object of field directions".to_string(),
            });
            return None;
        }
    };

    let mut spec = SortSpec::new();
    for (field, direction) in obj {
        match direction.as_i64().and_then(SortDirection::from_signum) {
            Some(dir) => spec.fields.push((field.to_string(), dir)),
            None => {
                diagnostics.push(Diagnostic::MalformedStage {
                    stage: "$sort",
                    detail: format!("direction for '{field}' must be 1 or -1"),
                });
            }
        }
    }
    Some(Stage::Sort(spec))
}

fn parse_limit(body: &Value, diagnostics: &mut Vec<Diagnostic>) -> Option<Stage> {
    match body.as_u64() {
        Some(n) => Some(Stage::Limit(n as usize)),
        None => {
            diagnostics.push(Diagnostic::MalformedStage {
                stage: "$limit",
                detail: "expected a non-negative integer".to_string(),
            });
            None
        }
    }
}
