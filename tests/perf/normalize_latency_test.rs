use std::time::Instant;

use serde_json::{json, Value};

use crate::render::render_row;
use crate::search_gateway::normalize_response;

fn p95_ms(samples: &mut [f64]) -> f64 {
    samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let last = samples.len().saturating_sub(1);
    let idx = ((last as f64) * 0.95).round() as usize;
    samples[idx.min(last)]
}

fn response_with(hits: usize) -> Value {
    let hits: Vec<Value> = (0..hits)
        .map(|i| {
            json!({
                "_id": format!("doc-{i:05}"),
                "_score": 10.0 - (i as f64) / 100.0,
                "fields": {
                    "name": [format!("Invoice_{i:05}.pdf")],
                    "path": [format!("/srv/docs/Invoice_{i:05}.pdf")],
                    "created_at": ["2024-03-01T10:00:00"],
                    "updated_at": ["2024-03-02T10:00:00"]
                },
                "highlight": {
                    "content": [format!("total due on <em>invoice</em> {i} <script>x</script>")]
                }
            })
        })
        .collect();
    json!({ "hits": { "hits": hits } })
}

#[test]
fn max_page_normalizes_and_renders_under_budget() {
    let raw = response_with(100);

    for _ in 0..10 {
        let _ = normalize_response(raw.clone());
    }

    let mut batch_p95 = Vec::with_capacity(5);
    for _ in 0..5 {
        let mut samples = Vec::with_capacity(40);
        for _ in 0..40 {
            let body = raw.clone();
            let start = Instant::now();
            let results = normalize_response(body).unwrap();
            let rows: Vec<_> = results.iter().map(|r| render_row(r, false)).collect();
            samples.push(start.elapsed().as_secs_f64() * 1000.0);
            assert_eq!(rows.len(), 100);
        }
        batch_p95.push(p95_ms(&mut samples));
    }

    batch_p95.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median_p95 = batch_p95[batch_p95.len() / 2];

    assert!(
        median_p95 <= 250.0,
        "median batch p95 too high: {median_p95:.3}ms (budget 250.0ms); batches={batch_p95:?}",
    );
}
