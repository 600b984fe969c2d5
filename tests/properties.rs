//! Property-based tests for extraction, oracle construction and execution.
//!
//! Random expression trees are rendered to fully bracketed source text and
//! compared against a direct evaluation of the tree.

use std::collections::BTreeSet;

use hdl_grover::{
    engine::StateVectorEngine,
    extract::extract,
    oracle::build,
    pipeline::{Compiled, compile},
};
use proptest::prelude::*;

const NAMES: [&str; 5] = ["a", "b", "c", "d", "e"];
const OPS: [&str; 6] = ["and", "or", "xor", "nand", "nor", "xnor"];

#[derive(Clone, Debug)]
enum Tree {
    Const(bool),
    Var(usize),
    Not(Box<Tree>),
    Bin(&'static str, Box<Tree>, Box<Tree>),
}

impl Tree {
    fn render(&self) -> String {
        match self {
            Tree::Const(b) => format!("'{}'", u8::from(*b)),
            Tree::Var(v) => NAMES[*v].to_owned(),
            Tree::Not(t) => format!("(not {})", t.render()),
            Tree::Bin(op, l, r) => format!("({} {op} {})", l.render(), r.render()),
        }
    }

    /// The same tree with the operands of every binary node swapped.
    fn mirror(&self) -> Tree {
        match self {
            Tree::Not(t) => Tree::Not(Box::new(t.mirror())),
            Tree::Bin(op, l, r) => Tree::Bin(*op, Box::new(r.mirror()), Box::new(l.mirror())),
            leaf => leaf.clone(),
        }
    }

    fn eval(&self, env: &dyn Fn(&str) -> bool) -> bool {
        match self {
            Tree::Const(b) => *b,
            Tree::Var(v) => env(NAMES[*v]),
            Tree::Not(t) => !t.eval(env),
            Tree::Bin(op, l, r) => {
                let (l, r) = (l.eval(env), r.eval(env));
                match *op {
                    "and" => l && r,
                    "or" => l || r,
                    "xor" => l != r,
                    "nand" => !(l && r),
                    "nor" => !(l || r),
                    _ => l == r,
                }
            }
        }
    }

    fn names(&self, out: &mut BTreeSet<&'static str>) {
        match self {
            Tree::Const(_) => {}
            Tree::Var(v) => {
                out.insert(NAMES[*v]);
            }
            Tree::Not(t) => t.names(out),
            Tree::Bin(_, l, r) => {
                l.names(out);
                r.names(out);
            }
        }
    }
}

fn tree() -> impl Strategy<Value = Tree> {
    let leaf = prop_oneof![
        1 => any::<bool>().prop_map(Tree::Const),
        4 => (0..NAMES.len()).prop_map(Tree::Var),
    ];
    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(|t| Tree::Not(Box::new(t))),
            (prop::sample::select(OPS.to_vec()), inner.clone(), inner)
                .prop_map(|(op, l, r)| Tree::Bin(op, Box::new(l), Box::new(r))),
        ]
    })
}

fn source(tree: &Tree) -> String {
    format!("out <= {};", tree.render())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn oracle_matches_direct_evaluation(t in tree()) {
        let (expr, vars) = extract(&source(&t)).unwrap();
        let oracle = build(&expr, &vars).unwrap();

        prop_assert_eq!(oracle.len(), 1 << vars.len());
        prop_assert_eq!(oracle.solutions().count(), oracle.solution_count());
        for i in 0..vars.search_space() {
            let assignment = vars.assignment(i);
            let env = |name: &str| {
                vars.iter()
                    .position(|n| n.as_str() == name)
                    .is_some_and(|j| assignment[j])
            };
            prop_assert_eq!(oracle.is_solution(i), t.eval(&env));
        }
    }

    #[test]
    fn variables_are_the_sorted_names_used(t in tree()) {
        let (_, vars) = extract(&source(&t)).unwrap();
        let mut expected = BTreeSet::new();
        t.names(&mut expected);
        let actual: Vec<_> = vars.iter().map(|n| n.as_str()).collect();
        prop_assert_eq!(actual, expected.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn extraction_is_deterministic(t in tree()) {
        let src = source(&t);
        prop_assert_eq!(extract(&src), extract(&src));
    }

    #[test]
    fn operand_order_does_not_change_the_oracle(t in tree()) {
        let (e1, v1) = extract(&source(&t)).unwrap();
        let (e2, v2) = extract(&source(&t.mirror())).unwrap();
        prop_assert_eq!(&v1, &v2);
        prop_assert_eq!(build(&e1, &v1).unwrap(), build(&e2, &v2).unwrap());
    }

    #[test]
    fn case_does_not_matter(t in tree()) {
        let src = source(&t);
        prop_assert_eq!(extract(&src), extract(&src.to_uppercase()));
    }

    #[test]
    fn counts_sum_to_shots(t in tree(), shots in 1u64..400, seed in any::<u64>()) {
        if let Compiled::Search(search) = compile(&source(&t)).unwrap() {
            let counts = search.run(&StateVectorEngine::new().with_seed(seed), shots).unwrap();
            prop_assert_eq!(counts.total(), shots);
            prop_assert!(counts.iter().all(|(bits, _)| bits.len() == search.variables.len()));
        }
    }
}
