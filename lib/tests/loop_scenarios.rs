//! End-to-end loop resolution scenarios
//!
//! The resolver only predicts signatures; the loops themselves are driven
//! here by test-local executors shaped exactly like the resolved clauses.

use invoke_oracle::combinator::{
    resolve_counted_loop, resolve_iterated_loop, resolve_loop, resolve_while_loop, Clause,
};
use invoke_oracle::MethodType;

fn mt(descriptor: &str) -> MethodType {
    MethodType::parse(descriptor).unwrap()
}

#[test]
fn factorial_via_counted_accumulation() {
    // counter { init = 0, step = i + 1 }
    // accumulator { init = 1, step = i * acc, pred = i < k, fini = acc }
    let counter = Clause::new().init(mt("()I")).step(mt("(I)I"));
    let accumulator = Clause::new()
        .init(mt("()I"))
        .step(mt("(III)I"))
        .predicate(mt("(III)Z"))
        .finalizer(mt("(III)I"));

    let signature = resolve_loop(&[counter, accumulator]).unwrap();
    assert_eq!(signature.state, mt("(II)V").parameters);
    assert_eq!(signature.externals, mt("(I)V").parameters);
    assert_eq!(signature.method_type().to_string(), "(III)I");

    // Drive the resolved shape: one external int argument in, steps run in
    // clause order, the predicate decides continuation, the finalizer
    // produces the result
    let factorial = |k: i32| {
        let (mut i, mut acc) = (0, 1);
        loop {
            i += 1;
            acc *= i;
            if i >= k {
                break;
            }
        }
        acc
    };
    assert_eq!(signature.externals.len(), 1);
    assert_eq!(factorial(5), 120);
}

#[test]
fn zip_via_while_loop() {
    let init = mt("(Ljava/util/Iterator;Ljava/util/Iterator;)Ljava/util/List;");
    let pred = mt("(Ljava/util/List;Ljava/util/Iterator;Ljava/util/Iterator;)Z");
    let step = mt("(Ljava/util/List;Ljava/util/Iterator;Ljava/util/Iterator;)Ljava/util/List;");

    let signature = resolve_while_loop(Some(&init), &pred, &step).unwrap();
    assert_eq!(signature.externals.len(), 2);
    assert_eq!(
        signature.method_type().to_string(),
        "(Ljava/util/List;Ljava/util/Iterator;Ljava/util/Iterator;)Ljava/util/List;"
    );

    // Drive the resolved shape with two four-element iterators: init makes
    // an empty list, the predicate tests both iterators, the step appends
    // one element from each
    let a = ["a1", "a2", "a3", "a4"];
    let b = ["b1", "b2", "b3", "b4"];
    let mut a_iter = a.iter().peekable();
    let mut b_iter = b.iter().peekable();
    let mut zipped: Vec<&str> = Vec::new();
    while a_iter.peek().is_some() && b_iter.peek().is_some() {
        zipped.push(a_iter.next().unwrap());
        zipped.push(b_iter.next().unwrap());
    }
    assert_eq!(zipped.len(), 8);
    assert_eq!(zipped, ["a1", "b1", "a2", "b2", "a3", "b3", "a4", "b4"]);
}

#[test]
fn counted_factorial() {
    // iterations = the external bound itself, init = 1, body multiplies by
    // the successor of the counter
    let signature =
        resolve_counted_loop(&mt("(I)I"), Some(&mt("(I)I")), &mt("(III)I")).unwrap();
    assert_eq!(signature.method_type().to_string(), "(II)I");

    let factorial = |k: i32| {
        let mut acc = 1;
        for counter in 0..k {
            acc *= counter + 1;
        }
        acc
    };
    assert_eq!(factorial(5), 120);
}

#[test]
fn iterated_collect() {
    let iterator = mt("(Ljava/lang/Iterable;)Ljava/util/Iterator;");
    let init = mt("(Ljava/lang/Iterable;)Ljava/util/List;");
    let body = mt("(Ljava/util/List;Ljava/lang/Object;)Ljava/util/List;");

    let signature = resolve_iterated_loop(Some(&iterator), Some(&init), &body).unwrap();
    assert_eq!(
        signature.method_type().to_string(),
        "(Ljava/util/List;Ljava/lang/Iterable;)Ljava/util/List;"
    );

    let source = [1, 2, 3];
    let mut collected = Vec::new();
    for element in source.iter() {
        collected.push(*element);
    }
    assert_eq!(collected, [1, 2, 3]);
}

#[test]
fn missing_predicate_lists_every_clause() {
    let clauses = [
        Clause::new().init(mt("()I")).step(mt("(I)I")),
        Clause::new().init(mt("()I")).step(mt("(II)I")),
        Clause::new()
            .init(mt("()I"))
            .step(mt("(III)I"))
            .finalizer(mt("(III)I")),
    ];
    match resolve_loop(&clauses) {
        Err(invoke_oracle::Error::InvalidArgument(reason)) => {
            assert!(reason.contains("no predicate found"), "{}", reason);
            assert!(
                reason.contains("[none, none, none]"),
                "all absent predicates are listed: {}",
                reason
            );
        }
        other => panic!("expected a missing-predicate failure, got {:?}", other),
    }
}

#[test]
fn resolution_is_deterministic() {
    let clauses = [
        Clause::new().init(mt("()I")).step(mt("(I)I")),
        Clause::new()
            .init(mt("()I"))
            .step(mt("(III)I"))
            .predicate(mt("(III)Z"))
            .finalizer(mt("(III)I")),
    ];
    let first = resolve_loop(&clauses).unwrap();
    let second = resolve_loop(&clauses).unwrap();
    assert_eq!(first, second);
}
