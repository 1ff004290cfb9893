//! Loose matching throughput
//!
//! Filtering a full set's worth of spoilers against a board of the same
//! size, and pairing reviews with board cards.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use spoiler_sync::domain::{BoardCard, FeedItem, Review, contains_loose, filter_new_items, match_reviews, normalize};

const SET_SIZE: usize = 300;

fn card_name(i: usize) -> String {
    format!("Thraben  Inspector, the {i}th")
}

fn spoilers() -> Vec<FeedItem> {
    (0..SET_SIZE)
        .map(|i| FeedItem::new(card_name(i), format!("https://feed/{i}"), format!("https://feed/{i}.jpg")))
        .collect()
}

fn board_names() -> Vec<String> {
    // Half the set already on the board, spelled slightly differently
    (0..SET_SIZE / 2).map(|i| card_name(i * 2).to_uppercase().replace("  ", " ")).collect()
}

fn loose_matching(c: &mut Criterion) {
    let known = board_names();

    c.bench_function("normalize card name", |b| {
        b.iter(|| normalize(black_box("Brisela,  Voice of Nightmares // Gisela's  Wrath")));
    });

    c.bench_function("contains_loose worst case", |b| {
        b.iter(|| contains_loose(black_box(&known), black_box("not on the board")));
    });

    c.bench_function("filter_new_items full set", |b| {
        b.iter_batched(spoilers, |items| filter_new_items(items, black_box(&known)), criterion::BatchSize::SmallInput);
    });

    let cards: Vec<BoardCard> = (0..SET_SIZE).map(|i| BoardCard::new(format!("c{i}"), card_name(i))).collect();
    let reviews: Vec<Review> = (0..SET_SIZE)
        .map(|i| Review::new(format!("{} // Back Face", card_name(i)), "3.0 // 2.5", "Solid."))
        .collect();

    c.bench_function("match_reviews full set", |b| {
        b.iter_batched(
            || reviews.clone(),
            |reviews| match_reviews(reviews, black_box(&cards)),
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, loose_matching);
criterion_main!(benches);
