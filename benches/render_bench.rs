use afriwiki_render::{ContentRenderer, EntityRef, EntityTable, RenderOptions, sanitize};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

const BIO: &str = "Awa Diop est une **entrepreneuse** senegalaise, fondatrice de Sahel Agro.\n\n\
## Parcours\n\n\
* Diplomee de [l'UCAD](https://www.ucad.sn)\n\
* Mentor chez [Jokkolabs](/e/jokkolabs)\n\n\
### Distinctions\n\n\
1. Prix *Jeune Talent* 2019\n\
2. Forbes Africa 30 under 30\n\n\
Elle travaille avec Moussa Ndiaye et Sahel Agro sur la filiere mil.";

fn build_table(size: usize) -> EntityTable {
    let mut entries: Vec<EntityRef> = (0..size)
        .map(|i| EntityRef::new(format!("Entrepreneur {i}"), format!("entrepreneur-{i}")))
        .collect();
    entries.push(EntityRef::new("Awa Diop", "awa-diop"));
    entries.push(EntityRef::new("Sahel Agro", "sahel-agro"));
    entries.push(EntityRef::new("Moussa Ndiaye", "moussa-ndiaye"));
    EntityTable::new(entries)
}

fn bench_render_listing(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_listing");

    for size in [10usize, 100, 1_000] {
        let renderer = ContentRenderer::new(&build_table(size), &RenderOptions::default());

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                // One listing page: 24 biographies
                for _ in 0..24 {
                    black_box(renderer.render(Some(black_box(BIO))));
                }
            });
        });
    }

    group.finish();
}

fn bench_sanitize(c: &mut Criterion) {
    let html = afriwiki_render::markdown_to_html(BIO).repeat(20);
    c.bench_function("sanitize_clean_fragment", |b| {
        b.iter(|| black_box(sanitize(black_box(&html))));
    });
}

criterion_group!(benches, bench_render_listing, bench_sanitize);
criterion_main!(benches);
