use housing_mlp::session::PlotLabels;

const W: f64 = 760.0;
const H: f64 = 460.0;
const PAD_L: f64 = 64.0;
const PAD_R: f64 = 16.0;
const PAD_T: f64 = 34.0;
const PAD_B: f64 = 48.0;

const GREY_GRID: &str = "#f0f2f5";
const GREY_TEXT: &str = "#999";
const DARK_TEXT: &str = "#333";
const BLUE_DARK: &str = "#1e40af";
const RED_DARK: &str = "#dc2626";

// ---------------------------------------------------------------------------
// Axes
// ---------------------------------------------------------------------------

/// Finite (min, max) of `values`, widened when every value is equal.
fn bounds(values: &[f64]) -> (f64, f64) {
    let (lo, hi) = values.iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() {
        return (0.0, 1.0);
    }
    if hi - lo < 1e-12 {
        return (lo - 0.5, hi + 0.5);
    }
    (lo, hi)
}

struct Frame {
    x: (f64, f64),
    y: (f64, f64),
}

impl Frame {
    fn px(&self, x: f64, y: f64) -> (f64, f64) {
        let sx = PAD_L + (x - self.x.0) / (self.x.1 - self.x.0) * (W - PAD_L - PAD_R);
        let sy = PAD_T + (self.y.1 - y) / (self.y.1 - self.y.0) * (H - PAD_T - PAD_B);
        (sx, sy)
    }

    /// Grid lines, tick values, axis labels and the title.
    fn axes(&self, labels: &PlotLabels) -> String {
        let y_ticks = (0..=4).map(|g| {
            let frac = g as f64 / 4.0;
            let val = self.y.0 + (self.y.1 - self.y.0) * frac;
            let y = PAD_T + (1.0 - frac) * (H - PAD_T - PAD_B);
            format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" fill=\"{}\" font-size=\"10\">{:.2}</text>\n\
                 <line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"1\"/>",
                PAD_L - 4.0, y + 4.0, GREY_TEXT, val,
                PAD_L, y, W - PAD_R, y, GREY_GRID
            )
        }).collect::<Vec<_>>().join("\n");

        let x_ticks = (0..=4).map(|g| {
            let frac = g as f64 / 4.0;
            let val = self.x.0 + (self.x.1 - self.x.0) * frac;
            let x = PAD_L + frac * (W - PAD_L - PAD_R);
            format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" fill=\"{}\" font-size=\"10\">{:.2}</text>\n\
                 <line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"1\"/>",
                x, H - PAD_B + 14.0, GREY_TEXT, val,
                x, PAD_T, x, H - PAD_B, GREY_GRID
            )
        }).collect::<Vec<_>>().join("\n");

        format!(
            "{}\n{}\n\
             <text x=\"{:.1}\" y=\"20\" text-anchor=\"middle\" fill=\"{}\" font-size=\"14\">{}</text>\n\
             <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" fill=\"{}\" font-size=\"11\">{}</text>\n\
             <text x=\"14\" y=\"{:.1}\" text-anchor=\"middle\" fill=\"{}\" font-size=\"11\" \
             transform=\"rotate(-90 14 {:.1})\">{}</text>",
            y_ticks, x_ticks,
            W / 2.0, DARK_TEXT, escape(&labels.title),
            (W + PAD_L - PAD_R) / 2.0, H - 10.0, DARK_TEXT, escape(&labels.x),
            H / 2.0, DARK_TEXT, H / 2.0, escape(&labels.y),
        )
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn document(body: String) -> String {
    format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n\
         <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n\
         {}\n\
         </svg>\n",
        W, H, body
    )
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

/// Scatter plot of `y` against `x`; pairs with a non-finite value are skipped.
pub fn build_svg_scatter(x: &[f64], y: &[f64], labels: &PlotLabels) -> String {
    let frame = Frame { x: bounds(x), y: bounds(y) };
    let points: String = x.iter().zip(y)
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(&a, &b)| {
            let (px, py) = frame.px(a, b);
            format!("<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"1.5\"/>", px, py)
        })
        .collect();

    document(format!(
        "{}\n<g fill=\"{}\" fill-opacity=\"0.35\">{}</g>",
        frame.axes(labels),
        BLUE_DARK,
        points
    ))
}

/// Training loss per iteration as a line.
pub fn build_svg_loss_curve(curve: &[f64]) -> Option<String> {
    if curve.len() < 2 {
        return None;
    }
    let n = curve.len();
    let (_, max_y) = bounds(curve);
    let frame = Frame { x: (1.0, n as f64), y: (0.0, max_y * 1.05) };

    let path: String = curve.iter().enumerate().map(|(i, &v)| {
        let (x, y) = frame.px((i + 1) as f64, v);
        if i == 0 { format!("M{:.1},{:.1}", x, y) } else { format!(" L{:.1},{:.1}", x, y) }
    }).collect();

    let labels = PlotLabels::new("Iteration", "Training loss", "Training Loss Curve");
    Some(document(format!(
        "{}\n<path d=\"{}\" stroke=\"{}\" stroke-width=\"2\" fill=\"none\"/>",
        frame.axes(&labels),
        path,
        RED_DARK
    )))
}

/// File name for a chart, derived from its title.
pub fn file_name(title: &str) -> String {
    let words: Vec<String> = title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty() && *w != "vs")
        .map(|w| w.to_ascii_lowercase())
        .collect();
    format!("{}.svg", words.join("_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scatter_draws_one_circle_per_finite_point() {
        let labels = PlotLabels::new("x", "y", "A & B");
        let svg = build_svg_scatter(&[0.0, 1.0, f64::NAN], &[1.0, 2.0, 3.0], &labels);
        assert_eq!(svg.matches("<circle").count(), 2);
        assert!(svg.contains("A &amp; B"));
    }

    #[test]
    fn loss_curve_needs_two_points() {
        assert!(build_svg_loss_curve(&[1.0]).is_none());
        assert!(build_svg_loss_curve(&[1.0, 0.5]).unwrap().contains("<path"));
    }

    #[test]
    fn file_names_follow_titles() {
        assert_eq!(file_name("Median Income vs. Median House Value"), "median_income_median_house_value.svg");
    }
}
