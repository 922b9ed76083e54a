use rand::{Rng, SeedableRng, rngs::StdRng};
use tagloom::{Context, Value};

/// Generate n random profile contexts to use in the benchmark
pub fn generate_random_contexts(n: usize) -> Vec<Context> {
    let mut rng = StdRng::seed_from_u64(42); // Fixed seed for reproducibility

    (0..n)
        .map(|_| {
            let items_count = rng.random_range(3..10);
            let items: Vec<Value> = (0..items_count)
                .map(|_| {
                    Value::object([
                        ("name", Value::from(random_string(&mut rng, 3, 8))),
                        ("value", Value::from(rng.random_range(10_i32..1000))),
                        ("special", Value::from(rng.random_bool(0.3))),
                    ])
                })
                .collect();

            let mut context = Context::new();
            context
                .insert(
                    "user",
                    Value::object([
                        ("name", Value::from(random_string(&mut rng, 5, 10))),
                        ("age", Value::from(rng.random_range(18_i32..80))),
                        ("active", Value::from(rng.random_bool(0.7))),
                    ]),
                )
                .insert("items", items)
                .insert("show_details", rng.random_bool(0.8))
                .insert("has_access", rng.random_bool(0.6))
                .insert("layout", "layout.html")
                .insert("row", "row.html");
            context
        })
        .collect()
}

/// Generate a random string with length between min and max
fn random_string(rng: &mut StdRng, min_len: usize, max_len: usize) -> String {
    let len = rng.random_range(min_len..=max_len);
    (0..len).map(|_| char::from(rng.random_range(b'a'..=b'z'))).collect()
}
