use frp_kinds::builders::{either, uniform, weighted_as};
use frp_kinds::{value, Arithmetic, ConditionalKind, FrpError, Hints, Kind, Quantity, Value};
use std::collections::HashMap;

fn q(s: &str) -> Quantity {
    s.parse().unwrap()
}

/// Mixer on {10, 20} and a target that strongly favours one of {4, 8}
fn noisy_copy() -> (Kind, ConditionalKind) {
    let mixer = either(10, 20, 1).unwrap();
    let copy = ConditionalKind::from_table(
        [
            (Value::from(10), either(4, 8, 99).unwrap()),
            (Value::from(20), either(8, 4, 99).unwrap()),
        ],
        Hints::new().codim(1).dim(1),
    )
    .unwrap();
    (mixer, copy)
}

#[test]
fn fair_coin() {
    let coin = either(0, 1, 1).unwrap();
    assert_eq!(coin.size(), 2);
    assert_eq!(coin.weights(), vec![q("1/2"), q("1/2")]);
    assert_eq!(coin.expectation().as_scalar(), Some(&q("1/2")));
}

#[test]
fn symbolic_values_with_ratio() {
    let a = q("a");
    let two_a = a.times(&q("2"));
    let k = either(a.clone(), two_a.clone(), 2).unwrap();
    assert_eq!(k.weight_of(&Value::from(a)), q("2/3"));
    assert_eq!(k.weight_of(&Value::from(two_a)), q("1/3"));
}

#[test]
fn mixture_joins_mixer_and_target() {
    let (mixer, copy) = noisy_copy();
    let joint = mixer.mixture(&copy).unwrap();
    assert_eq!(joint.dim(), 2);
    assert_eq!(
        joint.values().into_iter().collect::<Vec<_>>(),
        vec![value![10, 4], value![10, 8], value![20, 4], value![20, 8]]
    );
    assert_eq!(
        joint.weights(),
        vec![q("99/200"), q("1/200"), q("1/200"), q("99/200")]
    );
}

#[test]
fn conditioning_integrates_out_the_mixer() {
    let (mixer, copy) = noisy_copy();
    let target = mixer.conditioned_on(&copy).unwrap();
    assert_eq!(target, either(4, 8, 1).unwrap());

    let joint = mixer.mixture(&copy).unwrap();
    assert_eq!(joint.marginal(&[2]).unwrap(), target);
    assert_eq!(joint.marginal(&[1]).unwrap(), mixer);
}

#[test]
fn partial_table_is_rejected_by_mixture() {
    let mixer = either(10, 20, 1).unwrap();
    let partial =
        ConditionalKind::from_table([(Value::from(10), either(4, 8, 99).unwrap())], Hints::new())
            .unwrap();
    assert!(matches!(mixer.mixture(&partial), Err(FrpError::Kind(_))));
    assert!(matches!(
        mixer.conditioned_on(&partial),
        Err(FrpError::Kind(_))
    ));
}

#[test]
fn symbolic_weights_normalize() {
    let a = q("a");
    let k = weighted_as(
        [1, 2, 3],
        vec![q("1"), a.times(&q("2")), a.times(&q("4"))],
    )
    .unwrap();
    let shown: Vec<String> = k.weights().iter().map(ToString::to_string).collect();
    assert_eq!(shown, vec!["1/(1 + 6 a)", "2 a/(1 + 6 a)", "4 a/(1 + 6 a)"]);
    let total = k
        .weights()
        .iter()
        .fold(Quantity::zero(), |acc, w| acc.plus(w));
    assert_eq!(total, Quantity::one());
}

#[test]
fn substituting_weights_matches_numeric_construction() {
    let p = q("p");
    let symbolic = either(0, 1, p).unwrap();
    let mut mapping = HashMap::new();
    mapping.insert("p".to_string(), q("3"));
    let substituted: Vec<Quantity> = symbolic
        .weights()
        .iter()
        .map(|w| w.substitute(&mapping).unwrap())
        .collect();
    assert_eq!(substituted, either(0, 1, 3).unwrap().weights());
}

#[test]
fn filter_keeps_mass_until_renormalized() {
    let die = uniform((1..=6).map(Value::from)).unwrap();
    let even = die.filter(|v| {
        v.as_scalar()
            .and_then(Quantity::to_f64)
            .map_or(false, |x| x as i64 % 2 == 0)
    });
    assert_eq!(even.size(), 3);
    assert_eq!(even.weights(), vec![q("1/6"); 3]);

    let conditioned = even.renormalize().unwrap();
    assert_eq!(conditioned.weights(), vec![q("1/3"); 3]);
    assert_eq!(conditioned.expectation().as_scalar(), Some(&q("4")));
}

#[test]
fn function_conditional_drives_a_two_stage_experiment() {
    // Roll a die, then flip that many fair coins and count heads.
    let die = uniform((1..=3).map(Value::from)).unwrap();
    let heads = ConditionalKind::from_fn(
        |v: &Value| {
            let n = v.as_scalar().and_then(Quantity::to_f64).unwrap_or(0.0) as i64;
            let coin = either(0, 1, 1)?;
            let flips = coin.power(n)?;
            flips.try_map(|f| {
                let count = f
                    .components()
                    .iter()
                    .fold(Quantity::zero(), |acc, x| acc.plus(x));
                Ok(Value::from(count))
            })
        },
        Hints::new().codim(1),
    );
    let total = die.conditioned_on(&heads).unwrap();
    assert_eq!(total.expectation().as_scalar(), Some(&q("1")));
    assert_eq!(total.weight_of(&value![3]), q("1/24"));
}
