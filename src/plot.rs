use crate::types::Precision;
use std::fmt::Write;

/// Render an outcome distribution as a text bar chart, one line per outcome.
///
/// Each line holds the outcome in binary over `width_bits` digits, a bar of `#` where a
/// probability of one fills `bar_width` characters, and the probability itself.
///
/// # Example
/// ```
/// use qarith::plot::render_histogram;
///
/// let chart = render_histogram(&[0.25f64, 0.75], 1, 8);
/// assert_eq!(chart, "0 |##       | 0.2500\n1 |######   | 0.7500\n");
/// ```
pub fn render_histogram<P: Precision>(probs: &[P], width_bits: usize, bar_width: usize) -> String {
    let scale = P::from(bar_width).unwrap_or_else(P::zero);
    let mut out = String::new();
    for (i, p) in probs.iter().enumerate() {
        let filled = (*p * scale)
            .round()
            .to_usize()
            .unwrap_or(0)
            .min(bar_width);
        let _ = writeln!(
            out,
            "{:0w$b} |{}{} | {:.4}",
            i,
            "#".repeat(filled),
            " ".repeat(bar_width - filled),
            p,
            w = width_bits
        );
    }
    out
}
