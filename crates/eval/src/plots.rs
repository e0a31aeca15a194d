use anyhow::Result;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

use crate::report::EvaluationReport;

pub fn generate_plots(report: &EvaluationReport, output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;

    let path = output_dir.join("category_breakdown.svg");
    plot_category_breakdown(report, &path)?;
    Ok(path)
}

/// Stacked bars per category: correct at the bottom, then incorrect, then errors.
fn plot_category_breakdown(report: &EvaluationReport, path: &Path) -> Result<()> {
    let width = 200 + 120 * report.by_category.len().max(1) as u32;
    let root = SVGBackend::new(path, (width, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let categories: Vec<&str> = report.by_category.iter().map(|c| c.category.as_str()).collect();
    let max_total = report.by_category.iter().map(|c| c.total).max().unwrap_or(0).max(1);
    let n = categories.len().max(1);

    let mut chart = ChartBuilder::on(&root)
        .caption("Verification Outcomes by Category", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..n as f64, 0f64..(max_total as f64 * 1.2))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc("Claims")
        .x_labels(n)
        .x_label_formatter(&|x| {
            let idx = x.floor() as usize;
            categories.get(idx).map(|c| c.to_string()).unwrap_or_default()
        })
        .draw()?;

    let layers = [
        ("correct", GREEN),
        ("incorrect", RED),
        ("errors", RGBColor(128, 128, 128)),
    ];

    for (layer_idx, (name, color)) in layers.iter().enumerate() {
        let bars = report.by_category.iter().enumerate().map(|(i, stats)| {
            let base = match layer_idx {
                0 => 0,
                1 => stats.correct_match,
                _ => stats.correct_match + stats.incorrect_match,
            };
            let height = match layer_idx {
                0 => stats.correct_match,
                1 => stats.incorrect_match,
                _ => stats.errors,
            };
            Rectangle::new(
                [
                    (i as f64 + 0.2, base as f64),
                    (i as f64 + 0.8, (base + height) as f64),
                ],
                color.filled(),
            )
        });

        let color = *color;
        chart
            .draw_series(bars)?
            .label(*name)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
