//! DBSCAN on a small 2D dataset.
//!
//! Run with `RUST_LOG=dbscan=debug` to see clusters as they are discovered.

use dbscan::{Clustering, Dbscan, NamedPoint};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Three well-separated clusters in 2D, plus one outlier.
    let data: Vec<NamedPoint> = vec![
        // Cluster A (near origin)
        NamedPoint::new("a0", [0.0, 0.0]),
        NamedPoint::new("a1", [0.1, 0.2]),
        NamedPoint::new("a2", [0.2, 0.1]),
        NamedPoint::new("a3", [-0.1, 0.1]),
        // Cluster B (near (5, 5))
        NamedPoint::new("b0", [5.0, 5.0]),
        NamedPoint::new("b1", [5.1, 4.9]),
        NamedPoint::new("b2", [4.9, 5.1]),
        NamedPoint::new("b3", [5.2, 5.2]),
        // Cluster C (near (10, 0))
        NamedPoint::new("c0", [10.0, 0.0]),
        NamedPoint::new("c1", [10.1, 0.1]),
        NamedPoint::new("c2", [9.9, -0.1]),
        NamedPoint::new("c3", [10.2, 0.2]),
        // Outlier
        NamedPoint::new("x", [20.0, 20.0]),
    ];

    let dbscan = Dbscan::new(1.0, 3);

    let clusters = match dbscan.cluster(&data) {
        Ok(clusters) => clusters,
        Err(err) => {
            eprintln!("clustering failed: {err}");
            std::process::exit(1);
        }
    };

    println!("=== DBSCAN (eps=1.0, min_pts=3) ===");
    for (i, cluster) in clusters.iter().enumerate() {
        let names: Vec<&str> = cluster.iter().map(|p| p.name()).collect();
        println!("  cluster {i}: {}", names.join(", "));
    }

    let labels = match dbscan.labels(&data) {
        Ok(labels) => labels,
        Err(err) => {
            eprintln!("labeling failed: {err}");
            std::process::exit(1);
        }
    };
    for (point, label) in data.iter().zip(&labels) {
        let tag = match label {
            Some(k) => format!("cluster {k}"),
            None => "NOISE".to_string(),
        };
        let c = point.coords();
        println!("  point {:>2} ({:5.1}, {:5.1}) => {}", point.name(), c[0], c[1], tag);
    }
}
