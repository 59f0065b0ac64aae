use super::ExecutionError::*;
use super::*;
use crate::config::{ArityPolicy, Config, Scoping};
use crate::reader::parse;

fn forms(code: &str) -> Vec<Value> {
    parse(code).expect("valid code")
}

fn run_in(interpreter: &Interpreter, code: &str) -> Result<Vec<Option<Value>>, ExecutionError> {
    interpreter.run(&forms(code))
}

fn run(code: &str) -> Result<Vec<Option<Value>>, ExecutionError> {
    run_in(&Interpreter::new(), code)
}

// Value of the last form
fn last_in(interpreter: &Interpreter, code: &str) -> Result<Option<Value>, ExecutionError> {
    run_in(interpreter, code).map(|mut results| results.pop().expect("at least one form"))
}

fn last(code: &str) -> Result<Option<Value>, ExecutionError> {
    last_in(&Interpreter::new(), code)
}

fn with_config(config: Config) -> Interpreter {
    Interpreter::with_config(config)
}

macro_rules! value {
    ($v:expr) => (Ok(Some($v)))
}

fn num(n: i64) -> Value {
    Value::Number(n)
}

fn ident(s: &str) -> Value {
    Value::Identifier(s.to_owned())
}

#[test]
fn integer() {
    assert_eq![last("-1337"), value![num(-1337)]];
}

#[test]
fn atoms_evaluate_to_themselves() {
    assert_eq![last("\"hi\""), value![Value::String("hi".into())]];
    assert_eq![last("#f"), value![Value::Boolean(false)]];
}

#[test]
fn quote_integer() {
    assert_eq![last("(quote 7)"), value![num(7)]];
}

#[test]
fn quote_list() {
    assert_eq![
        last("(quote (1 2 3))"),
        value![Value::list(vec![num(1), num(2), num(3)])]
    ];
}

#[test]
fn quote_does_not_evaluate() {
    assert_eq![last("(quote undefined-thing)"), value![ident("undefined-thing")]];
    assert_eq![
        last("(quote (+ 1 . 2))"),
        value![Value::improper_list(vec![ident("+"), num(1)], num(2))]
    ];
}

#[test]
fn reject_quote_with_multiple_arguments() {
    assert_eq![last("(quote 7 2)"), Err(TooManyArguments("quote"))];
}

#[test]
fn reject_quote_with_no_arguments() {
    assert_eq![last("(quote)"), Err(NotEnoughArguments("quote"))];
}

#[test]
fn addition() {
    assert_eq![last("(+ 123 456)"), value![num(579)]];
    assert_eq![last("(+ 1 2 3)"), value![num(6)]];
    assert_eq![last("(+)"), value![num(0)]];
}

#[test]
fn nested_addition() {
    assert_eq![last("(+ (+ 1 2) (+ 3 4))"), value![num(10)]];
}

#[test]
fn subtraction() {
    assert_eq![last("(- 2 7)"), value![num(-5)]];
    assert_eq![last("(- 10 1 2 3)"), value![num(4)]];
}

#[test]
fn subtraction_with_one_operand_is_negation() {
    assert_eq![last("(- 8)"), value![num(-8)]];
}

#[test]
fn reject_subtraction_with_no_operands() {
    assert_eq![last("(-)"), Err(NotEnoughArguments("-"))];
}

#[test]
fn multiplication() {
    assert_eq![last("(* 7 2)"), value![num(14)]];
    assert_eq![last("(*)"), value![num(1)]];
}

#[test]
fn arithmetic_needs_numbers() {
    assert_eq![
        last("(+ 1 (quote a))"),
        Err(BadArgument("+: expected a number, got a".into()))
    ];
    assert_eq![last("(* 9223372036854775807 2)"), Err(Overflow)];
}

#[test]
fn reject_null_procedure() {
    assert_eq![last("()"), Err(NotCallable("()".into()))];
}

#[test]
fn reject_number_as_procedure() {
    assert_eq![last("(27)"), Err(NotCallable("27".into()))];
    assert_eq![last("(\"f\" 1)"), Err(NotCallable("\"f\"".into()))];
}

#[test]
fn reject_procedure_call_with_dot() {
    assert_eq![last("(+ 1 . 2)"), Err(ImproperListCall)];
    assert_eq![last("(quote 1 . 2)"), Err(ImproperListCall)];
}

#[test]
fn reject_unknown_identifier() {
    assert_eq![
        last("this-does-not-exist"),
        Err(UnknownIdentifier("this-does-not-exist".into()))
    ];
}

#[test]
fn reject_calling_unknown_identifier() {
    assert_eq![
        last("(this-does-not-exist)"),
        Err(UnknownIdentifier("this-does-not-exist".into()))
    ];
}

#[test]
fn define() {
    assert_eq![run("(define the-answer 42) the-answer"), Ok(vec![None, Some(num(42))])];
}

#[test]
fn reject_define_with_too_many_arguments() {
    assert_eq![last("(define hello 2 3)"), Err(TooManyArguments("define"))];
}

#[test]
fn reject_define_with_no_arguments() {
    assert_eq![last("(define)"), Err(NotEnoughArguments("define"))];
}

#[test]
fn reject_define_with_one_argument() {
    assert_eq![last("(define foo)"), Err(NotEnoughArguments("define"))];
}

#[test]
fn define_requires_an_identifier_as_first_argument() {
    assert_eq![
        last("(define 7 2)"),
        Err(BadArgument("define: first argument must be an identifier, got 7".into()))
    ];
}

#[test]
fn define_evaluates_its_value() {
    assert_eq![run("(define one 1) (+ one one)"), Ok(vec![None, Some(num(2))])];
    assert_eq![last("(define x (* 6 7)) x"), value![num(42)]];
}

#[test]
fn defining_alias_for_procedure() {
    assert_eq![run("(define plus +) (plus 7 2)"), Ok(vec![None, Some(num(9))])];
}

#[test]
fn defining_alias_for_special_form() {
    assert_eq![last("(define q quote) (q x)"), value![ident("x")]];
}

#[test]
fn redefining_primitives() {
    assert_eq![last("(define + *) (+ 3 4)"), value![num(12)]];
}

#[test]
fn case_sensitive_by_default() {
    assert_eq![
        last("(define FOO 42) FoO"),
        Err(UnknownIdentifier("FoO".into()))
    ];
}

#[test]
fn if_chooses_a_branch() {
    assert_eq![last("(if #t 1 2)"), value![num(1)]];
    assert_eq![last("(if #f 1 2)"), value![num(2)]];
}

#[test]
fn empty_list_is_truthy() {
    assert_eq![last("(if (quote ()) 1 2)"), value![num(1)]];
    assert_eq![last("(if 0 1 2)"), value![num(1)]];
}

#[test]
fn if_without_false_branch() {
    assert_eq![last("(if #f 42)"), Ok(None)];
    assert_eq![last("(if #t 42)"), value![num(42)]];
}

#[test]
fn if_only_evaluates_one_branch() {
    assert_eq![last("(if #t 1 undefined-thing)"), value![num(1)]];
    assert_eq![last("(if #f (undefined-thing) 2)"), value![num(2)]];
}

#[test]
fn if_argument_count() {
    assert_eq![last("(if #t)"), Err(NotEnoughArguments("if"))];
    assert_eq![last("(if #t 1 2 3)"), Err(TooManyArguments("if"))];
}

#[test]
fn no_value_where_a_value_is_needed() {
    assert_eq![last("(+ (define x 1) 2)"), Err(NoValue)];
    assert_eq![last("((define y 1))"), Err(NoValue)];
    assert_eq![last("(define z (if #f 1))"), Err(NoValue)];
}

#[test]
fn no_value_condition_is_true() {
    assert_eq![last("(if (if #f #f) 1 2)"), value![num(1)]];
    assert_eq![last("(if (define c 0) c 2)"), value![num(0)]];
}

#[test]
fn define_without_a_value_binds_nothing() {
    let interpreter = Interpreter::new();
    assert_eq![
        run_in(&interpreter, "(define z (if #f 1))"),
        Err(NoValue)
    ];
    assert_eq![
        interpreter.eval_one(&ident("z")),
        Err(UnknownIdentifier("z".into()))
    ];
}

#[test]
fn lambda_call() {
    assert_eq![last("((lambda (x) (* x x)) 7)"), value![num(49)]];
    assert_eq![last("((lambda () 5))"), value![num(5)]];
}

#[test]
fn named_lambda() {
    assert_eq![
        run("(define square (lambda (x) (* x x))) (square 12)"),
        Ok(vec![None, Some(num(144))])
    ];
}

#[test]
fn arguments_are_evaluated_left_to_right() {
    assert_eq![
        last("((lambda (x y) x) (first-missing) (second-missing))"),
        Err(UnknownIdentifier("first-missing".into()))
    ];
    assert_eq![
        last("(+ first-missing second-missing)"),
        Err(UnknownIdentifier("first-missing".into()))
    ];
}

#[test]
fn lambda_argument_count() {
    assert_eq![last("(lambda)"), Err(NotEnoughArguments("lambda"))];
    assert_eq![last("(lambda (x))"), Err(NotEnoughArguments("lambda"))];
}

#[test]
fn lambda_ignores_extra_body_forms() {
    assert_eq![last("((lambda (x) x (undefined)) 3)"), value![num(3)]];
}

#[test]
fn lambda_rejects_bad_parameters() {
    assert_eq![
        last("(lambda (x 1) x)"),
        Err(BadArgument("lambda: parameter 1 is not an identifier".into()))
    ];
    assert_eq![
        last("(lambda (x . 1) x)"),
        Err(BadArgument("lambda: bad parameter list ending in 1".into()))
    ];
    assert_eq![
        last("(lambda 7 x)"),
        Err(BadArgument("lambda: bad parameter list ending in 7".into()))
    ];
}

#[test]
fn rest_parameters() {
    assert_eq![
        last("((lambda (a . rest) rest) 1 2 3)"),
        value![Value::list(vec![num(2), num(3)])]
    ];
    assert_eq![last("((lambda (a . rest) rest) 1)"), value![Value::EmptyList]];
    assert_eq![
        last("((lambda args args) 1 2)"),
        value![Value::list(vec![num(1), num(2)])]
    ];
    assert_eq![last("((lambda args args))"), value![Value::EmptyList]];
}

#[test]
fn lenient_arity() {
    assert_eq![last("((lambda (a b) a) 1)"), value![num(1)]];
    assert_eq![last("((lambda (a) a) 1 2)"), value![num(1)]];
    assert_eq![last("((lambda (a b) b) 1)"), Err(UnknownIdentifier("b".into()))];
}

#[test]
fn strict_arity() {
    let interpreter = with_config(Config {
        arity: ArityPolicy::Strict,
        ..Config::default()
    });

    assert_eq![
        last_in(&interpreter, "((lambda (a b) a) 1)"),
        Err(ArityMismatch { expected: 2, given: 1 })
    ];
    assert_eq![
        last_in(&interpreter, "((lambda (a) a) 1 2)"),
        Err(ArityMismatch { expected: 1, given: 2 })
    ];
    assert_eq![
        last_in(&interpreter, "((lambda (a . r) a))"),
        Err(ArityMismatch { expected: 1, given: 0 })
    ];
    assert_eq![last_in(&interpreter, "((lambda (a . r) a) 1 2 3)"), value![num(1)]];
    assert_eq![last_in(&interpreter, "((lambda (a b) b) 1 2)"), value![num(2)]];
}

#[test]
fn closures_capture_their_frame() {
    let code = "(define make-adder (lambda (n) (lambda (m) (+ n m)))) \
                (define add5 (make-adder 5)) \
                (add5 10)";
    assert_eq![last(code), value![num(15)]];

    let interpreter = Interpreter::new();
    run_in(&interpreter, code).unwrap();
    assert_eq![last_in(&interpreter, "(define n 100) (add5 1)"), value![num(6)]];
}

#[test]
fn lexical_scoping_keeps_caller_bindings() {
    let code = "(define x 1) (define f (lambda (x) x)) (f 2) x";
    assert_eq![run(code), Ok(vec![None, None, Some(num(2)), Some(num(1))])];

    let code = "(define g (lambda (x) x)) \
                (define f (lambda (x) (+ x (g 10) x))) \
                (f 1)";
    assert_eq![last(code), value![num(12)]];
}

#[test]
fn inner_define_stays_in_the_call_frame() {
    assert_eq![
        run("(define h (lambda (x) (define local x))) (h 3) local"),
        Err(UnknownIdentifier("local".into()))
    ];

    let flat = with_config(Config {
        scoping: Scoping::Flat,
        ..Config::default()
    });
    assert_eq![
        run_in(&flat, "(define h (lambda (x) (define local x))) (h 3) local"),
        Ok(vec![None, None, Some(num(3))])
    ];
}

#[test]
fn flat_scoping_shares_one_table() {
    let interpreter = with_config(Config {
        scoping: Scoping::Flat,
        ..Config::default()
    });

    let code = "(define x 1) (define f (lambda (x) x)) (f 2) x";
    assert_eq![
        run_in(&interpreter, code),
        Ok(vec![None, None, Some(num(2)), Some(num(2))])
    ];

    let code = "(define g (lambda (x) x)) \
                (define f (lambda (x) (+ x (g 10) x))) \
                (f 1)";
    assert_eq![last_in(&interpreter, code), value![num(21)]];

    let code = "(define make-adder (lambda (n) (lambda (m) (+ n m)))) \
                (define add5 (make-adder 5)) \
                (define n 100) \
                (add5 1)";
    assert_eq![last_in(&interpreter, code), value![num(101)]];
}

#[test]
fn closure_identity() {
    let results = run("(define f (lambda (x) x)) f f (lambda (x) x)").unwrap();
    assert_eq![results[1], results[2]];
    assert!(results[1] != results[3]);
}

#[test]
fn runaway_recursion() {
    let interpreter = with_config(Config {
        max_depth: 50,
        ..Config::default()
    });
    assert_eq![
        last_in(&interpreter, "(define f (lambda () (f))) (f)"),
        Err(StackOverflow)
    ];
    // the depth counter is back to zero afterwards
    assert_eq![last_in(&interpreter, "(+ 1 (+ 1 (+ 1 1)))"), value![num(4)]];
}

#[test]
fn deep_but_bounded_nesting() {
    let mut code = String::from("0");
    for _ in 0..100 {
        code = format!("(+ 1 {})", code);
    }
    assert_eq![last(&code), value![num(100)]];
}

#[test]
fn failed_run_keeps_earlier_definitions() {
    let interpreter = Interpreter::new();
    assert_eq![
        run_in(&interpreter, "(define a 1) (oops) (define b 2)"),
        Err(UnknownIdentifier("oops".into()))
    ];
    assert_eq![interpreter.eval_one(&ident("a")), value![num(1)]];
    assert_eq![
        interpreter.eval_one(&ident("b")),
        Err(UnknownIdentifier("b".into()))
    ];
}

#[test]
fn root_frame_bindings() {
    let interpreter = Interpreter::new();
    let root = interpreter.root().borrow();

    for name in &["+", "-", "*"] {
        match root.get(name) {
            Some(Value::NativeProcedure(p)) => assert_eq![p.name(), *name],
            other => panic!("{} is {:?}", name, other),
        }
    }
    for name in &["define", "if", "lambda", "quote"] {
        match root.get(name) {
            Some(Value::NativeSpecialForm(f)) => assert_eq![f.name(), *name],
            other => panic!("{} is {:?}", name, other),
        }
    }
}

#[test]
fn procedures_display() {
    assert_eq![last("+").unwrap().unwrap().to_string(), "<procedure +>"];
    assert_eq![last("if").unwrap().unwrap().to_string(), "<special form if>"];
    assert_eq![last("(lambda (x) x)").unwrap().unwrap().to_string(), "<closure>"];
}

#[test]
fn closure_keeps_params_and_body() {
    match last("(lambda (a b) (+ a b))") {
        Ok(Some(Value::Closure(closure))) => {
            assert_eq![closure.params(), &Value::list(vec![ident("a"), ident("b")])];
            assert_eq![
                closure.body(),
                &Value::list(vec![ident("+"), ident("a"), ident("b")])
            ];
        }
        other => panic!("not a closure: {:?}", other),
    }
}

#[test]
fn errors_display() {
    assert_eq![NotEnoughArguments("quote").to_string(), "quote: not enough arguments"];
    assert_eq![
        UnknownIdentifier("xyzzy".into()).to_string(),
        "unknown identifier: xyzzy"
    ];
    assert_eq![
        ArityMismatch { expected: 2, given: 3 }.to_string(),
        "wrong number of arguments: expected 2, given 3"
    ];
}
