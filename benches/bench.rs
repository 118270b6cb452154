// Criterion benchmarks for Food Friend

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use food_friend::core::{interpret, normalize_food_list, score_pair, CuisineCatalog, Matcher};
use food_friend::models::{FoodProfile, ScoringWeights};

const DISHES: &[&str] = &[
    "tacos", "ramen", "pizza", "pho", "kimchi", "biryani", "pad thai", "dumplings",
    "boba", "sushi", "lasagna", "fried chicken", "mexican food", "curry", "noodles",
];

fn create_candidate(id: usize) -> FoodProfile {
    let foods = (0..4).map(|offset| DISHES[(id * 3 + offset * 5) % DISHES.len()]);
    FoodProfile::with_foods(format!("User {}", id), foods)
}

fn bench_normalize(c: &mut Criterion) {
    let catalog = CuisineCatalog::default();
    let foods = ["Mexican cuisine", "Spicy Korean BBQ", "bubble tea", "Pad Thai", "sourdough"];

    c.bench_function("normalize_food_list", |b| {
        b.iter(|| normalize_food_list(black_box(&foods), &catalog));
    });
}

fn bench_score_pair(c: &mut Criterion) {
    let catalog = CuisineCatalog::default();
    let weights = ScoringWeights::default();
    let a = create_candidate(1);
    let b = create_candidate(2);

    c.bench_function("score_pair", |bench| {
        bench.iter(|| score_pair(black_box(&a), black_box(&b), &catalog, &weights));
    });
}

fn bench_rank_deterministic(c: &mut Criterion) {
    let matcher = Matcher::with_defaults();
    let subject = FoodProfile::with_foods("me", ["ramen", "korean food", "tacos"]);

    let mut group = c.benchmark_group("ranking");

    for candidate_count in [10, 50, 100, 500, 1000].iter() {
        let candidates: Vec<FoodProfile> = (0..*candidate_count).map(create_candidate).collect();

        group.bench_with_input(
            BenchmarkId::new("rank_deterministic", candidate_count),
            candidate_count,
            |b, _| {
                b.iter(|| matcher.rank_deterministic(black_box(&subject), black_box(&candidates), black_box(10)));
            },
        );
    }

    group.finish();
}

fn bench_parse_cascade(c: &mut Criterion) {
    let a = vec!["galbi".to_string()];
    let b = vec!["asada".to_string()];
    let prose = "I would rate their compatibility at 62 because both enjoy grilled meat.";

    c.bench_function("interpret_fuzzy_prose", |bench| {
        bench.iter(|| interpret(black_box(prose), &a, &b));
    });
}

criterion_group!(
    benches,
    bench_normalize,
    bench_score_pair,
    bench_rank_deterministic,
    bench_parse_cascade
);

criterion_main!(benches);
