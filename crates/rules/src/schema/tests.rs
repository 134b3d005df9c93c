//! Tests for schema types.

use super::*;

const PIPELINE_YAML: &str = r#"
apiVersion: v1
kind: RulePipeline
metadata:
  id: latency-p99
  name: Latency p99
  description: p99 request latency above 500ms
  tags: [http, latency]
data:
  - refId: A
    datasourceUid: tempo-prod
    queryType: traceql
    relativeTimeRange: { from: 300, to: 0 }
    model:
      refId: A
      query: "{ span.http.status_code >= 200 }"
      intervalMs: 1000
expressions:
  - refId: B
    queryType: expression
    datasourceUid: __expr__
    model:
      type: reduce
      refId: B
      expression: A
      reducer: max
      settings:
        mode: strict
  - refId: C
    queryType: expression
    datasourceUid: __expr__
    model:
      type: threshold
      refId: C
      expression: B
      conditions:
        - evaluator: { params: [0.5], type: gt }
          query: { params: [B] }
          reducer: { params: [], type: last }
          type: query
condition: C
"#;

#[test]
fn parse_pipeline() {
    let pipeline: RulePipeline = serde_yaml::from_str(PIPELINE_YAML).unwrap();
    assert_eq!(pipeline.api_version, API_VERSION);
    assert_eq!(pipeline.kind, PIPELINE_KIND);
    assert_eq!(pipeline.metadata.id, "latency-p99");
    assert!(pipeline.metadata.enabled);

    let data = &pipeline.data[0];
    assert_eq!(data.datasource_uid, "tempo-prod");
    assert_eq!(data.query_type, "traceql");
    assert_eq!(
        data.relative_time_range,
        Some(RelativeTimeRange { from: 300, to: 0 })
    );
    assert_eq!(data.model["intervalMs"], 1000);

    let reduce = pipeline.expressions[0].model.as_reduce().unwrap();
    assert_eq!(reduce.reducer, Some(ReducerFunction::Max));
    assert_eq!(reduce.mode(), Some(ReducerMode::Strict));

    let threshold = pipeline.expressions[1].model.as_threshold().unwrap();
    let cond = &threshold.conditions.as_ref().unwrap()[0];
    assert_eq!(cond.evaluator.kind, EvalFunction::IsAbove);
    assert_eq!(cond.kind, "query");
    assert!(cond.unload_evaluator.is_none());

    assert!(pipeline.is_simple_condition());
}

#[test]
fn round_trip() {
    let pipeline: RulePipeline = serde_yaml::from_str(PIPELINE_YAML).unwrap();
    let yaml = pipeline.to_yaml().unwrap();
    let pipeline2: RulePipeline = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(pipeline, pipeline2);
}

#[test]
fn empty_reducer_mode_reads_as_strict() {
    let model: ExpressionModel = serde_json::from_str(
        r#"{ "type": "reduce", "refId": "B", "reducer": "last", "settings": { "mode": "" } }"#,
    )
    .unwrap();
    assert_eq!(model.as_reduce().unwrap().mode(), Some(ReducerMode::Strict));
}

#[test]
fn reducer_modes_use_wire_names() {
    let mode: ReducerMode = serde_json::from_str(r#""dropNN""#).unwrap();
    assert_eq!(mode, ReducerMode::DropNonNumbers);
    let mode: ReducerMode = serde_json::from_str(r#""replaceNN""#).unwrap();
    assert_eq!(mode, ReducerMode::ReplaceNonNumbers);
    let mode: ReducerMode = serde_json::from_str(r#""strict""#).unwrap();
    assert_eq!(mode, ReducerMode::Strict);
    assert_eq!(serde_json::to_string(&ReducerMode::Strict).unwrap(), "\"\"");
}

#[test]
fn strict_mode_is_written_as_empty_string() {
    let pipeline: RulePipeline = serde_yaml::from_str(PIPELINE_YAML).unwrap();
    let yaml = pipeline.to_yaml().unwrap();
    assert!(!yaml.contains("strict"), "unexpected YAML:\n{yaml}");

    let settings = serde_json::to_value(ReduceSettings {
        mode: Some(ReducerMode::Strict),
        replace_with_value: None,
    })
    .unwrap();
    assert_eq!(settings, serde_json::json!({ "mode": "" }));

    let reparsed: RulePipeline = serde_yaml::from_str(&yaml).unwrap();
    assert!(reparsed.is_simple_condition());
}

#[test]
fn null_unload_evaluator_is_absent() {
    let cond: ThresholdCondition = serde_json::from_str(
        r#"{
            "evaluator": { "params": [1], "type": "lt" },
            "unloadEvaluator": null,
            "query": { "params": ["B"] },
            "reducer": { "params": [], "type": "last" },
            "type": "query"
        }"#,
    )
    .unwrap();
    assert!(cond.unload_evaluator.is_none());
    assert_eq!(cond.evaluator.params, vec![1.0]);
}

#[test]
fn unload_evaluator_index_finds_first() {
    let mut populated = ThresholdCondition::new(Evaluator::default(), "B");
    populated.unload_evaluator = Some(Evaluator::new(EvalFunction::IsBelow, vec![0.0]));

    let threshold = ThresholdExpression {
        ref_id: "C".to_string(),
        expression: Some("B".to_string()),
        conditions: Some(vec![
            ThresholdCondition::new(Evaluator::default(), "B"),
            populated.clone(),
            populated,
        ]),
    };
    assert_eq!(threshold.unload_evaluator_index(), Some(1));

    let bare = ThresholdExpression {
        conditions: None,
        ..threshold
    };
    assert_eq!(bare.unload_evaluator_index(), None);
}

#[test]
fn other_expression_types_parse() {
    let exprs: Vec<ExpressionQuery> = serde_yaml::from_str(
        r#"
- refId: M
  model: { type: math, refId: M, expression: "$A + $B" }
- refId: R
  model: { type: resample, refId: R, expression: A, window: 1m, downsampler: mean, upsampler: fillna }
- refId: K
  model:
    type: classic_conditions
    refId: K
    conditions:
      - evaluator: { params: [3], type: gt }
        operator: { type: and }
        query: { params: [A] }
        reducer: { params: [], type: avg }
        type: query
- refId: S
  model: { type: sql, refId: S, expression: "SELECT * FROM A" }
"#,
    )
    .unwrap();

    let types: Vec<_> = exprs.iter().map(|e| e.model.type_name()).collect();
    assert_eq!(types, vec!["math", "resample", "classic_conditions", "sql"]);
    assert_eq!(exprs[0].model.ref_id(), "M");
    match &exprs[2].model {
        ExpressionModel::ClassicConditions(c) => {
            assert_eq!(c.conditions[0].operator.as_ref().unwrap().kind, "and");
        }
        other => panic!("expected classic conditions, got {}", other.type_name()),
    }
}

#[test]
fn unknown_expression_type_errors() {
    let result: Result<ExpressionModel, _> =
        serde_json::from_str(r#"{ "type": "forecast", "refId": "F" }"#);
    assert!(result.is_err());
}

#[test]
fn malformed_documents_error() {
    // Data query without a model.
    let missing_model = r#"
apiVersion: v1
kind: RulePipeline
metadata: { id: x, name: X }
data:
  - refId: A
    datasourceUid: prom
"#;
    assert!(serde_yaml::from_str::<RulePipeline>(missing_model).is_err());

    // Unknown top-level field.
    let unknown_field = r#"
apiVersion: v1
kind: RulePipeline
metadata: { id: x, name: X }
schedule: { cron: "* * * * *" }
"#;
    assert!(serde_yaml::from_str::<RulePipeline>(unknown_field).is_err());

    // Unknown evaluator function.
    let bad_eval = r#"{ "params": [1], "type": "roughly" }"#;
    assert!(serde_json::from_str::<Evaluator>(bad_eval).is_err());
}

#[test]
fn eval_function_arity() {
    assert_eq!(EvalFunction::IsAbove.arity(), 1);
    assert_eq!(EvalFunction::IsLessThanEqual.arity(), 1);
    assert_eq!(EvalFunction::IsWithinRange.arity(), 2);
    assert_eq!(EvalFunction::IsOutsideRangeIncluded.arity(), 2);
    assert_eq!(EvalFunction::HasNoValue.arity(), 0);
    assert!(!EvalFunction::IsEqual.is_range());
    assert_eq!(EvalFunction::IsWithinRangeIncluded.to_string(), "within_range_included");
}

#[test]
fn expression_query_new_copies_model_ref_id() {
    let query = ExpressionQuery::new(ExpressionModel::Sql(SqlExpression {
        ref_id: "S".to_string(),
        expression: "SELECT 1".to_string(),
    }));
    assert_eq!(query.ref_id, "S");
    assert_eq!(query.datasource_uid, EXPRESSION_DATASOURCE_UID);
    assert_eq!(query.query_type, EXPRESSION_QUERY_TYPE);
}
