use approx::assert_relative_eq;
use ndsel::{s, stack, NdArray, NdError, Selector, SelectorError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn make_array(rows: usize, cols: usize) -> NdArray {
    NdArray::from_fn(&[rows, cols], |idx| (idx[0] * cols + idx[1]) as f64)
}

#[test]
fn test_scalar_assign() {
    let mut a = NdArray::scalar(3.25);
    assert!(a == 3.25);
    a.set_value(2.0).unwrap();
    assert_eq!(a.value().unwrap(), 2.0);
    assert!(a == 2.0);
}

#[test]
fn test_rank1_literal() {
    let a = NdArray::from_vec(vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    assert_eq!(a.size(), 5);
    assert!(a.at(4).unwrap() == 4.0);
    assert_eq!(a.iter().collect::<Vec<_>>(), vec![0.0, 1.0, 2.0, 3.0, 4.0]);

    let b = a.share();
    assert!(b.is(&a));
    let c = a.copy();
    assert!(!c.is(&a));
    assert!(!c.shares(&a));
    assert_eq!(c, a);
}

#[test]
fn test_select_rows_matches_parent() {
    let a = make_array(3, 4);
    let b = a.select(s![(0, 2)]).unwrap();
    for i in 0..2 {
        for j in 0..4 {
            assert_eq!(b.get(&[i, j]).unwrap(), a.get(&[i, j]).unwrap());
        }
    }
}

#[test]
fn test_iteration_order_matches_indexing() {
    let a = make_array(3, 4);
    let mut expected = Vec::new();
    for i in 0..3 {
        for j in 0..4 {
            expected.push(a.get(&[i, j]).unwrap());
        }
    }
    assert_eq!(a.to_vec(), expected);
}

#[test]
fn test_view_mutation_visible_in_parent() {
    let a = NdArray::<f64>::zeros(&[4, 5]);
    let mut v = a.select(s![1..3, (0, 5, 2)]).unwrap();
    assert!(v.shares(&a));
    v.fill(1.0);
    for (index, value) in a.indexed_iter() {
        let selected = (1..3).contains(&index[0]) && index[1] % 2 == 0;
        assert_eq!(value, if selected { 1.0 } else { 0.0 });
    }
}

#[test]
fn test_is_implies_shares() {
    let a = make_array(3, 4);
    let views = [
        a.share(),
        a.at(1).unwrap(),
        a.select(s![.., 2]).unwrap(),
        a.copy(),
    ];
    for x in &views {
        for y in &views {
            if x.is(y) {
                assert!(x.shares(y));
            }
        }
    }
    assert!(views[1].shares(&a) && !views[1].is(&a));
    assert!(!views[3].shares(&a));
}

#[test]
fn test_rebind_versus_assign() {
    let a = NdArray::from_vec(vec![1.0, 2.0, 3.0]);
    let b = NdArray::from_vec(vec![7.0, 8.0, 9.0]);

    let mut target = NdArray::<f64>::zeros(&[3]);
    target.assign(&b).unwrap();
    assert_eq!(target, b);
    assert!(!target.shares(&b));

    target.rebind(&a);
    assert!(target.is(&a));
    target.set(&[0], 0.0).unwrap();
    assert_eq!(a.get(&[0]).unwrap(), 0.0);
}

#[test]
fn test_row_assignment() {
    let m = NdArray::<f64>::zeros(&[3, 4]);
    for i in 0..3 {
        let row = NdArray::<f64>::full(&[4], i as f64);
        m.at(i).unwrap().assign(&row).unwrap();
    }
    for i in 0..3 {
        assert!(m.at(i).unwrap().iter().all(|x| x == i as f64));
    }
}

#[test]
fn test_resize_rules() {
    let mut a = NdArray::<f64>::empty(2);
    a.resize(&[2, 2]).unwrap();
    assert_eq!(a.size(), 4);
    assert!(matches!(a.resize(&[3]), Err(NdError::ResizeOnNonEmpty(_))));
}

#[test]
fn test_elementwise_arithmetic() {
    let mut a = NdArray::<f64>::zeros(&[10, 10]);
    a.fill(2.0);
    let b = &a + 1.0;
    assert!(b.iter().all(|x| x == 3.0));

    let alias = a.share();
    a += &alias;
    assert!(a.iter().all(|x| x == 4.0));
}

#[test]
fn test_stack_three() {
    let arrays: Vec<NdArray> = (0..3)
        .map(|k| NdArray::<f64>::full(&[100], k as f64))
        .collect();
    let refs: Vec<&NdArray> = arrays.iter().collect();
    let s = stack(&refs).unwrap();
    assert_eq!(s.shape().as_slice(), &[3, 100]);
    assert_relative_eq!(s.sum(), 300.0);
}

#[test]
fn test_out_of_bounds_is_reported() {
    let a = make_array(3, 4);
    assert!(a.get(&[3, 0]).unwrap_err().is_out_of_bounds());
    assert!(a.at(3).unwrap_err().is_out_of_bounds());
    assert!(a.select(s![0..5]).unwrap_err().is_out_of_bounds());
    assert_eq!(
        a.select(s![1, 1, 1]).unwrap_err(),
        NdError::Selector(SelectorError::RankMismatch(3, 2))
    );
}

#[test]
fn test_selector_collapse_contract() {
    let sel = Selector::new(&[10, 12]);
    assert_eq!(sel.collapse(0).unwrap().size(), 120);

    let strided = sel.skip(1, 5).unwrap();
    assert!(matches!(
        strided.collapse(0),
        Err(SelectorError::InvalidCollapse { axis: 0 })
    ));
}

/// Random views of a random array agree with indexing into a copy.
#[test]
fn test_random_views_read_parent() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..100 {
        let rows = rng.gen_range(1..8);
        let cols = rng.gen_range(1..8);
        let a = NdArray::from_fn(&[rows, cols], |_| rng.gen::<f64>());

        let r0 = rng.gen_range(0..rows);
        let r1 = rng.gen_range(r0..=rows);
        let rs = rng.gen_range(1..4);
        let c0 = rng.gen_range(0..cols);
        let c1 = rng.gen_range(c0..=cols);
        let cs = rng.gen_range(1..4);
        let v = a.select(s![(r0, r1, rs), (c0, c1, cs)]).unwrap();

        assert!(v.shares(&a));
        let copy = v.copy();
        for (index, value) in v.indexed_iter() {
            let parent = a
                .get(&[r0 + index[0] * rs, c0 + index[1] * cs])
                .unwrap();
            assert_eq!(value, parent);
            assert_eq!(copy.get(&index).unwrap(), value);
        }
    }
}
