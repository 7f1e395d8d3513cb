use super::*;

#[derive(Debug)]
enum Chain {
    End,
    Link(Box<Chain>),
}

fn build(depth: usize) -> Chain {
    let mut chain = Chain::End;
    for _ in 0..depth {
        chain = Chain::Link(Box::new(chain));
    }
    chain
}

fn depth_of(chain: &Chain) -> usize {
    ensure_sufficient_stack(|| match chain {
        Chain::End => 0,
        Chain::Link(next) => depth_of(next) + 1,
    })
}

fn unwind(mut chain: Chain) {
    // Iterative drop so the test does not overflow while tearing down.
    while let Chain::Link(next) = chain {
        chain = *next;
    }
}

#[test]
fn shallow_walk() {
    let chain = build(10);
    assert_eq!(depth_of(&chain), 10);
    unwind(chain);
}

#[test]
fn deep_walk_grows_stack() {
    let chain = build(100_000);
    assert_eq!(depth_of(&chain), 100_000);
    unwind(chain);
}

#[test]
fn passes_results_through() {
    let result: Result<u8, &str> = ensure_sufficient_stack(|| Ok(7));
    assert_eq!(result, Ok(7));
}
