//! The gap/chunk/fill protocol behind reusable query templates.

use vellum_cbor::{EncodeOptions, Error, Fills, Gap, Value, decode, encode, encode_with};

fn partial_opts<'a>() -> EncodeOptions<'a> {
    EncodeOptions {
        partial: true,
        ..Default::default()
    }
}

fn fills(entries: Vec<(&Gap, Value)>) -> Fills {
    entries
        .into_iter()
        .map(|(gap, value)| (gap.clone(), value))
        .collect()
}

#[test]
fn template_produces_segments_around_gaps() {
    let gap = Gap::new();
    let value = Value::Array(vec![
        Value::Integer(1),
        Value::Gap(gap.clone()),
        Value::Integer(3),
    ]);

    let partial = encode_with(&value, &partial_opts())
        .unwrap()
        .into_partial()
        .unwrap();
    let remaining: Vec<&Gap> = partial.gaps().collect();
    assert_eq!(remaining, vec![&gap]);

    let bytes = partial
        .build(&fills(vec![(&gap, Value::Integer(2))]), true)
        .unwrap()
        .into_bytes()
        .unwrap();
    let resolved = Value::Array(vec![
        Value::Integer(1),
        Value::Integer(2),
        Value::Integer(3),
    ]);
    assert_eq!(bytes, encode(&resolved).unwrap());
}

#[test]
fn fills_supplied_at_encode_time_resolve_inline() {
    let gap = Gap::new();
    let value = Value::Array(vec![Value::Gap(gap.clone())]);
    let substitutions = fills(vec![(&gap, Value::from("inline"))]);
    let opts = EncodeOptions {
        fills: Some(&substitutions),
        ..Default::default()
    };

    // with a fill present, no partial output is needed even without
    // partial mode
    let out = encode_with(&value, &opts).unwrap();
    assert!(!out.is_partial());
    assert_eq!(
        out.into_bytes().unwrap(),
        encode(&Value::Array(vec![Value::from("inline")])).unwrap()
    );
}

#[test]
fn gaps_outside_partial_mode_are_an_error() {
    let gap = Gap::new();
    let value = Value::Array(vec![Value::Gap(gap.clone())]);
    match encode(&value) {
        Err(Error::PartialDisabled { gap: id }) => assert_eq!(id, gap.id()),
        other => panic!("expected partial-disabled, got {other:?}"),
    }
}

#[test]
fn build_requires_fill_or_default_when_complete() {
    let gap = Gap::new();
    let value = Value::Array(vec![Value::Gap(gap.clone())]);
    let partial = encode_with(&value, &partial_opts())
        .unwrap()
        .into_partial()
        .unwrap();

    match partial.build(&Fills::new(), true) {
        Err(Error::FillMissing { gap: id }) => assert_eq!(id, gap.id()),
        other => panic!("expected fill-missing, got {other:?}"),
    }
}

#[test]
fn declared_defaults_fill_unsupplied_gaps() {
    let gap = Gap::with_default(Value::Integer(100));
    let value = Value::Array(vec![Value::Gap(gap.clone())]);
    let partial = encode_with(&value, &partial_opts())
        .unwrap()
        .into_partial()
        .unwrap();

    let bytes = partial
        .build(&Fills::new(), true)
        .unwrap()
        .into_bytes()
        .unwrap();
    assert_eq!(
        bytes,
        encode(&Value::Array(vec![Value::Integer(100)])).unwrap()
    );

    // an explicit fill wins over the default
    let bytes = partial
        .build(&fills(vec![(&gap, Value::Integer(7))]), true)
        .unwrap()
        .into_bytes()
        .unwrap();
    assert_eq!(bytes, encode(&Value::Array(vec![Value::Integer(7)])).unwrap());
}

#[test]
fn staged_fills_match_a_single_build() {
    let first = Gap::new();
    let second = Gap::new();
    let value = Value::Array(vec![
        Value::Gap(first.clone()),
        Value::from("mid"),
        Value::Gap(second.clone()),
    ]);
    let template = encode_with(&value, &partial_opts())
        .unwrap()
        .into_partial()
        .unwrap();

    // fill the second gap first; the first stays pending
    let staged = template
        .build(&fills(vec![(&second, Value::Integer(2))]), false)
        .unwrap()
        .into_partial()
        .unwrap();
    assert_eq!(staged.gaps().count(), 1);

    let staged_bytes = staged
        .build(&fills(vec![(&first, Value::Integer(1))]), true)
        .unwrap()
        .into_bytes()
        .unwrap();
    let all_at_once = template
        .build(
            &fills(vec![
                (&first, Value::Integer(1)),
                (&second, Value::Integer(2)),
            ]),
            true,
        )
        .unwrap()
        .into_bytes()
        .unwrap();
    assert_eq!(staged_bytes, all_at_once);
    assert_eq!(
        staged_bytes,
        encode(&Value::Array(vec![
            Value::Integer(1),
            Value::from("mid"),
            Value::Integer(2),
        ]))
        .unwrap()
    );
}

#[test]
fn build_with_no_fills_reproduces_the_template() {
    let gap = Gap::new();
    let value = Value::Array(vec![Value::Gap(gap.clone()), Value::Bool(true)]);
    let template = encode_with(&value, &partial_opts())
        .unwrap()
        .into_partial()
        .unwrap();

    let rebuilt = template
        .build(&Fills::new(), false)
        .unwrap()
        .into_partial()
        .unwrap();
    assert_eq!(rebuilt, template);
}

#[test]
fn nested_partials_merge_into_the_outer_template() {
    let inner_gap = Gap::new();
    let inner = encode_with(
        &Value::Array(vec![Value::from("inner"), Value::Gap(inner_gap.clone())]),
        &partial_opts(),
    )
    .unwrap()
    .into_partial()
    .unwrap();

    let outer_gap = Gap::new();
    let outer = Value::Array(vec![
        Value::Gap(outer_gap.clone()),
        Value::from(inner.clone()),
    ]);
    let template = encode_with(&outer, &partial_opts())
        .unwrap()
        .into_partial()
        .unwrap();
    let pending: Vec<u64> = template.gaps().map(Gap::id).collect();
    assert_eq!(pending, vec![outer_gap.id(), inner_gap.id()]);

    let bytes = template
        .build(
            &fills(vec![
                (&outer_gap, Value::Integer(1)),
                (&inner_gap, Value::Integer(2)),
            ]),
            true,
        )
        .unwrap()
        .into_bytes()
        .unwrap();
    let resolved = Value::Array(vec![
        Value::Integer(1),
        Value::Array(vec![Value::from("inner"), Value::Integer(2)]),
    ]);
    assert_eq!(bytes, encode(&resolved).unwrap());
}

#[test]
fn embedded_partials_resolve_inline_when_partial_mode_is_off() {
    let gap = Gap::new();
    let inner = encode_with(&Value::Gap(gap.clone()), &partial_opts())
        .unwrap()
        .into_partial()
        .unwrap();

    let substitutions = fills(vec![(&gap, Value::Integer(9))]);
    let opts = EncodeOptions {
        fills: Some(&substitutions),
        ..Default::default()
    };
    let bytes = encode_with(&Value::Array(vec![Value::from(inner.clone())]), &opts)
        .unwrap()
        .into_bytes()
        .unwrap();
    assert_eq!(bytes, encode(&Value::Array(vec![Value::Integer(9)])).unwrap());

    // without a fill, full resolution fails naming the gap
    match encode(&Value::Array(vec![Value::from(inner)])) {
        Err(Error::FillMissing { gap: id }) => assert_eq!(id, gap.id()),
        other => panic!("expected fill-missing, got {other:?}"),
    }
}

#[test]
fn pre_encoded_blocks_splice_verbatim() {
    let inner = Value::Array(vec![Value::Integer(1), Value::from("two")]);
    let cached = encode(&inner).unwrap();

    let spliced = encode(&Value::Array(vec![
        Value::Encoded(cached),
        Value::Bool(false),
    ]))
    .unwrap();
    let direct = encode(&Value::Array(vec![inner, Value::Bool(false)])).unwrap();
    assert_eq!(spliced, direct);
}

#[test]
fn fill_values_may_themselves_be_trees() {
    let gap = Gap::new();
    let template = encode_with(
        &Value::Array(vec![Value::from("q"), Value::Gap(gap.clone())]),
        &partial_opts(),
    )
    .unwrap()
    .into_partial()
    .unwrap();

    let mut object = indexmap::IndexMap::new();
    object.insert("limit".to_owned(), Value::Integer(10));
    object.insert("offset".to_owned(), Value::Integer(20));
    let filled = template
        .build(&fills(vec![(&gap, Value::Object(object.clone()))]), true)
        .unwrap()
        .into_bytes()
        .unwrap();

    assert_eq!(
        decode(&filled).unwrap(),
        Value::Array(vec![Value::from("q"), Value::Object(object)])
    );
}

#[test]
fn rebuilding_a_template_is_repeatable() {
    let gap = Gap::new();
    let template = encode_with(&Value::Array(vec![Value::Gap(gap.clone())]), &partial_opts())
        .unwrap()
        .into_partial()
        .unwrap();

    for n in 0..3i64 {
        let bytes = template
            .build(&fills(vec![(&gap, Value::Integer(n))]), true)
            .unwrap()
            .into_bytes()
            .unwrap();
        assert_eq!(bytes, encode(&Value::Array(vec![Value::Integer(n)])).unwrap());
    }
}
