use rand::Rng;
use tagloom::{Engine, InMemoryLoader, Source};

pub fn get_engine(templates: Vec<(&str, Source)>) -> Engine {
    Engine::new(templates.into_iter().collect::<InMemoryLoader>())
}

pub fn generate_random_whitespace() -> String {
    let mut rng = rand::rng();
    let length = rng.random_range(0..10);
    (0..length).map(|_| ' ').collect()
}

pub fn generate_random_whitespace_at_least_one() -> String {
    let mut rng = rand::rng();
    let length = rng.random_range(1..10);
    (0..length).map(|_| ' ').collect()
}

/// `base.html`: a page layout with `title` and `content` blocks.
pub fn base_layout() -> Source {
    Source::new()
        .text("<title>")
        .open("block", "title")
        .text("Site")
        .close("block")
        .text("</title><body>")
        .open("block", "content")
        .text("nothing here")
        .close("block")
        .text("</body>")
}
