//! Tests for whole-tree evaluation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use gauge_ir::{ExpressionFunction, OperatorSymbol, StageNode, TypeErrorTemplate, Value};
use pretty_assertions::assert_eq;

use crate::config::{EvalConfig, DEFAULT_MAX_DEPTH};
use crate::errors::RuntimeError;
use crate::evaluator::{evaluate, Evaluator};
use crate::parameters::{MapParameters, NoParameters, ParameterError, Parameters};

fn lit(value: impl Into<Value>) -> StageNode {
    StageNode::literal(value)
}

fn param(name: &str) -> StageNode {
    StageNode::parameter(name)
}

fn infix(symbol: OperatorSymbol, left: StageNode, right: StageNode) -> StageNode {
    StageNode::infix(symbol, left, right).unwrap()
}

fn prefix(symbol: OperatorSymbol, operand: StageNode) -> StageNode {
    StageNode::prefix(symbol, operand).unwrap()
}

/// `cond ? then : otherwise`
fn ternary(cond: StageNode, then: StageNode, otherwise: StageNode) -> StageNode {
    infix(
        OperatorSymbol::TernaryElse,
        infix(OperatorSymbol::TernaryIf, cond, then),
        otherwise,
    )
}

fn args(items: Vec<StageNode>) -> StageNode {
    let mut items = items.into_iter().rev();
    let mut chain = items.next().unwrap();
    for item in items {
        chain = infix(OperatorSymbol::Separator, item, chain);
    }
    chain
}

/// Function returning its arguments as a sequence.
fn collect() -> ExpressionFunction {
    ExpressionFunction::new("collect", |args| Ok(Value::sequence(args.to_vec())))
}

fn negations(count: usize) -> StageNode {
    let mut node = lit(1);
    for _ in 0..count {
        node = prefix(OperatorSymbol::Negate, node);
    }
    node
}

#[test]
fn test_arithmetic_over_parameters() {
    // (a + b) * 2
    let tree = infix(
        OperatorSymbol::Mul,
        infix(OperatorSymbol::Add, param("a"), param("b")),
        lit(2),
    );
    let params = MapParameters::new().with("a", 3).with("b", 4.5);
    assert_eq!(evaluate(&tree, &params).unwrap(), Value::from(15));
}

#[test]
fn test_same_tree_different_parameters() {
    let tree = infix(OperatorSymbol::Gt, param("load"), lit(0.8));
    let evaluator = Evaluator::default();
    let busy = MapParameters::new().with("load", 0.95);
    let idle = MapParameters::new().with("load", 0.1);
    assert_eq!(evaluator.evaluate(&tree, &busy).unwrap(), Value::from(true));
    assert_eq!(evaluator.evaluate(&tree, &idle).unwrap(), Value::from(false));
}

#[test]
fn test_prefix_operators() {
    let tree = prefix(
        OperatorSymbol::Negate,
        infix(OperatorSymbol::Add, lit(2), lit(3)),
    );
    assert_eq!(evaluate(&tree, &NoParameters).unwrap(), Value::from(-5));

    let tree = prefix(OperatorSymbol::Invert, infix(OperatorSymbol::Eq, lit(1), lit(2)));
    assert_eq!(evaluate(&tree, &NoParameters).unwrap(), Value::from(true));

    let tree = prefix(OperatorSymbol::BitNot, lit(5));
    assert_eq!(evaluate(&tree, &NoParameters).unwrap(), Value::from(-6));
}

#[test]
fn test_ternary_branches() {
    let taken = ternary(lit(true), lit(5), lit(10));
    assert_eq!(evaluate(&taken, &NoParameters).unwrap(), Value::from(5));

    let untaken = ternary(lit(false), lit(5), lit(10));
    assert_eq!(evaluate(&untaken, &NoParameters).unwrap(), Value::from(10));
}

#[test]
fn test_nested_ternaries() {
    // false ? 1 : (true ? 2 : 3)
    let in_else = ternary(lit(false), lit(1), ternary(lit(true), lit(2), lit(3)));
    assert_eq!(evaluate(&in_else, &NoParameters).unwrap(), Value::from(2));

    // true ? (false ? 1 : 2) : 3
    let in_then = ternary(lit(true), ternary(lit(false), lit(1), lit(2)), lit(3));
    assert_eq!(evaluate(&in_then, &NoParameters).unwrap(), Value::from(2));
}

#[test]
fn test_ternary_then_branch_nil_is_kept() {
    let tree = ternary(lit(true), param("maybe"), lit(10));
    let params = MapParameters::new().with("maybe", Value::Nil);
    assert_eq!(evaluate(&tree, &params).unwrap(), Value::Nil);
}

#[test]
fn test_ternary_without_else() {
    let tree = infix(OperatorSymbol::TernaryIf, lit(false), lit(1));
    assert_eq!(evaluate(&tree, &NoParameters).unwrap(), Value::Nil);

    let tree = infix(OperatorSymbol::TernaryIf, lit(true), lit(1));
    assert_eq!(evaluate(&tree, &NoParameters).unwrap(), Value::from(1));
}

#[test]
fn test_ternary_condition_type_error() {
    let tree = ternary(lit(1), lit(2), lit(3));
    let err = evaluate(&tree, &NoParameters).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Value '1' cannot be used with the ternary operator '?', it is not a bool"
    );
}

#[test]
fn test_call_without_arguments() {
    let tree = StageNode::call(collect(), None);
    assert_eq!(evaluate(&tree, &NoParameters).unwrap(), Value::sequence(vec![]));
}

#[test]
fn test_call_with_one_argument() {
    let tree = StageNode::call(collect(), Some(lit("only")));
    assert_eq!(
        evaluate(&tree, &NoParameters).unwrap(),
        Value::sequence(vec![Value::from("only")])
    );

    let tree = StageNode::call(collect(), Some(lit(Value::Nil)));
    assert_eq!(
        evaluate(&tree, &NoParameters).unwrap(),
        Value::sequence(vec![Value::Nil])
    );
}

#[test]
fn test_call_with_right_nested_arguments() {
    let tree = StageNode::call(collect(), Some(args(vec![lit(1), lit(2), lit(3), lit(4)])));
    assert_eq!(
        evaluate(&tree, &NoParameters).unwrap(),
        Value::sequence(vec![
            Value::from(1),
            Value::from(2),
            Value::from(3),
            Value::from(4)
        ])
    );
}

#[test]
fn test_call_with_left_nested_arguments() {
    // ((1, 2), 3)
    let chain = infix(
        OperatorSymbol::Separator,
        infix(OperatorSymbol::Separator, lit(1), lit(2)),
        lit(3),
    );
    let tree = StageNode::call(collect(), Some(chain));
    assert_eq!(
        evaluate(&tree, &NoParameters).unwrap(),
        Value::sequence(vec![Value::from(1), Value::from(2), Value::from(3)])
    );
}

fn count() -> ExpressionFunction {
    ExpressionFunction::new("count", |args| Ok(Value::from(args.len())))
}

#[test]
fn test_sequence_parameter_is_one_argument() {
    let list = Value::sequence(vec![Value::from(1), Value::from(2)]);
    let params = MapParameters::new().with("list", list);

    let beside_scalar = StageNode::call(count(), Some(args(vec![param("list"), lit(1)])));
    assert_eq!(evaluate(&beside_scalar, &params).unwrap(), Value::from(2));

    let after_scalar = StageNode::call(count(), Some(args(vec![lit(1), param("list")])));
    assert_eq!(evaluate(&after_scalar, &params).unwrap(), Value::from(2));

    let alone = StageNode::call(count(), Some(param("list")));
    assert_eq!(evaluate(&alone, &params).unwrap(), Value::from(1));
}

#[test]
fn test_sequence_result_is_one_argument() {
    let pair =
        ExpressionFunction::new("pair", |_| Ok(Value::sequence(vec![Value::from(1), Value::from(2)])));
    let tree = StageNode::call(
        count(),
        Some(args(vec![lit(0), StageNode::call(pair.clone(), None)])),
    );
    assert_eq!(evaluate(&tree, &NoParameters).unwrap(), Value::from(2));

    // collect(pair(), 3) keeps the pair nested
    let nested = StageNode::call(
        collect(),
        Some(args(vec![StageNode::call(pair, None), lit(3)])),
    );
    assert_eq!(
        evaluate(&nested, &NoParameters).unwrap(),
        Value::sequence(vec![
            Value::sequence(vec![Value::from(1), Value::from(2)]),
            Value::from(3)
        ])
    );
}

#[test]
fn test_bare_argument_list_evaluates_to_sequence() {
    let tree = args(vec![lit(1), lit(2)]);
    assert_eq!(
        evaluate(&tree, &NoParameters).unwrap(),
        Value::sequence(vec![Value::from(1), Value::from(2)])
    );
}

#[test]
fn test_call_result_feeds_operators() {
    let max = ExpressionFunction::new("max", |args| {
        let mut best = f64::NEG_INFINITY;
        for arg in args {
            let Some(n) = arg.as_number() else {
                return Err(format!("max: '{arg}' is not a number").into());
            };
            best = best.max(n);
        }
        Ok(Value::Number(best))
    });
    let tree = infix(
        OperatorSymbol::Add,
        StageNode::call(max.clone(), Some(args(vec![lit(3), param("x"), lit(1)]))),
        lit(1),
    );
    let params = MapParameters::new().with("x", 7);
    assert_eq!(evaluate(&tree, &params).unwrap(), Value::from(8));

    let bad = StageNode::call(max, Some(args(vec![lit(1), lit("two")])));
    let err = evaluate(&bad, &NoParameters).unwrap_err();
    assert_eq!(err.to_string(), "max: 'two' is not a number");
}

#[test]
fn test_logical_type_error_names_value_and_symbol() {
    let tree = infix(OperatorSymbol::And, lit(1), lit(true));
    let err = evaluate(&tree, &NoParameters).unwrap_err();
    let type_error = err.as_type_error().unwrap();
    assert_eq!(type_error.template, TypeErrorTemplate::Logical);
    assert_eq!(type_error.value, "1");
    assert_eq!(type_error.symbol, "&&");
    assert_eq!(
        err.to_string(),
        "Value '1' cannot be used with the logical operator '&&', it is not a bool"
    );
}

#[test]
fn test_regex_against_parameter_pattern() {
    let tree = infix(OperatorSymbol::RegexMatch, param("host"), param("rule"));
    let params = MapParameters::new()
        .with("host", "db-07")
        .with("rule", "^db-[0-9]+$");
    assert_eq!(evaluate(&tree, &params).unwrap(), Value::from(true));

    let broken = MapParameters::new().with("host", "db-07").with("rule", "[");
    let err = evaluate(&tree, &broken).unwrap_err();
    assert!(err.is_runtime_error());
}

#[test]
fn test_missing_parameter() {
    let tree = infix(OperatorSymbol::Add, param("x"), lit(1));
    let err = evaluate(&tree, &NoParameters).unwrap_err();
    assert!(matches!(
        err.as_runtime_error(),
        Some(RuntimeError::Parameter(ParameterError::Missing { name })) if name == "x"
    ));
}

#[test]
fn test_left_failure_skips_right() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&calls);
    let tally = ExpressionFunction::new("tally", move |_| {
        counted.fetch_add(1, Ordering::SeqCst);
        Ok(Value::from(1))
    });

    let tree = infix(
        OperatorSymbol::Add,
        param("absent"),
        StageNode::call(tally.clone(), None),
    );
    assert!(evaluate(&tree, &NoParameters).is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let tree = infix(OperatorSymbol::Add, lit(1), StageNode::call(tally, None));
    assert_eq!(evaluate(&tree, &NoParameters).unwrap(), Value::from(2));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

struct Failing;

impl Parameters for Failing {
    fn get(&self, name: &str) -> Result<Value, ParameterError> {
        Err(ParameterError::resolver(format!("lookup of '{name}' timed out")))
    }
}

#[test]
fn test_resolver_failure_is_runtime_error() {
    let err = evaluate(&param("x"), &Failing).unwrap_err();
    assert!(err.is_runtime_error());
    assert_eq!(err.to_string(), "lookup of 'x' timed out");
}

#[test]
fn test_dyn_parameters() {
    let params: Box<dyn Parameters> = Box::new(MapParameters::new().with("x", 2));
    let tree = infix(OperatorSymbol::Mul, param("x"), param("x"));
    assert_eq!(evaluate(&tree, params.as_ref()).unwrap(), Value::from(4));
}

#[test]
fn test_depth_limit_boundary() {
    let evaluator = Evaluator::new(EvalConfig::new().with_max_depth(10));
    assert_eq!(evaluator.config().max_depth(), Some(10));

    // Nine negations over a literal: depth ten
    let at_limit = negations(9);
    assert_eq!(at_limit.depth(), 10);
    assert_eq!(evaluator.evaluate(&at_limit, &NoParameters).unwrap(), Value::from(-1));

    let over_limit = negations(10);
    let err = evaluator.evaluate(&over_limit, &NoParameters).unwrap_err();
    assert!(matches!(
        err.as_runtime_error(),
        Some(RuntimeError::DepthLimitExceeded { limit: 10 })
    ));
}

#[test]
fn test_default_depth_limit() {
    let tree = negations(DEFAULT_MAX_DEPTH);
    let err = evaluate(&tree, &NoParameters).unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("expression exceeds the maximum evaluation depth of {DEFAULT_MAX_DEPTH}")
    );
}

#[test]
fn test_unlimited_depth_grows_stack() {
    let evaluator = Evaluator::new(EvalConfig::new().unlimited_depth());
    let tree = negations(100_000);
    assert_eq!(evaluator.evaluate(&tree, &NoParameters).unwrap(), Value::from(1));
}

#[test]
fn test_init_tracing_is_idempotent() {
    crate::init_tracing();
    crate::init_tracing();
}
