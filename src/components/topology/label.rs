//! Ellipsis fitting of node labels against a pixel budget.

/// Suffix marking a shortened label.
pub const ELLIPSIS: &str = "...";

// Absorbs float noise when summing glyph advances.
const EPSILON: f64 = 1e-6;

fn is_cjk(c: char) -> bool {
	('\u{4E00}'..='\u{9FA5}').contains(&c)
}

/// Advance of one glyph as a fraction of the font size, for a proportional
/// sans-serif face.
fn glyph_ratio(c: char) -> f64 {
	match c {
		'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '!' | '|' | '\'' => 0.28,
		'f' | 't' | 'r' | 'I' | '(' | ')' | '[' | ']' | '-' | ' ' | '/' => 0.36,
		'm' | 'w' | 'M' | 'W' | '@' => 0.86,
		'0'..='9' => 0.56,
		'A'..='Z' => 0.66,
		_ => 0.55,
	}
}

/// Estimated advance of `c`. CJK ideographs take a full em.
pub fn char_width(c: char, font_size: f64) -> f64 {
	if is_cjk(c) {
		font_size
	} else {
		glyph_ratio(c) * font_size
	}
}

/// Estimated rendered width of `text`.
pub fn text_width(text: &str, font_size: f64) -> f64 {
	text.chars().map(|c| char_width(c, font_size)).sum()
}

/// Longest prefix of `text` whose width stays within `budget`.
fn fitting_prefix(text: &str, budget: f64, font_size: f64) -> &str {
	let mut width = 0.0;
	for (i, c) in text.char_indices() {
		width += char_width(c, font_size);
		if width > budget + EPSILON {
			return &text[..i];
		}
	}
	text
}

/// Truncates `text` with an ellipsis so it fits `max_width` pixels.
///
/// Text that already fits is returned unchanged, so fitting is idempotent.
pub fn fit_label(text: &str, max_width: f64, font_size: f64) -> String {
	if max_width <= 0.0 {
		return String::new();
	}
	if text_width(text, font_size) <= max_width + EPSILON {
		return text.to_string();
	}
	let ellipsis_width = text_width(ELLIPSIS, font_size);
	if max_width < ellipsis_width {
		return fitting_prefix(ELLIPSIS, max_width, font_size).to_string();
	}
	let prefix = fitting_prefix(text, max_width - ellipsis_width, font_size);
	format!("{prefix}{ELLIPSIS}")
}

#[cfg(test)]
mod tests {
	use super::*;

	const POD: &str = "deployment-prometheus-prod-57f46848c9-699n8";

	#[test]
	fn long_names_are_truncated_with_an_ellipsis() {
		let fitted = fit_label(POD, 80.0, 13.0);
		assert!(fitted.ends_with(ELLIPSIS));
		assert!(fitted.len() < POD.len());
		assert!(POD.starts_with(fitted.trim_end_matches(ELLIPSIS)));
		assert!(text_width(&fitted, 13.0) <= 80.0 + EPSILON);
	}

	#[test]
	fn fitting_is_idempotent() {
		for width in [20.0, 55.5, 80.0, 140.0, 400.0] {
			let once = fit_label(POD, width, 13.0);
			assert_eq!(fit_label(&once, width, 13.0), once, "width {width}");
		}
	}

	#[test]
	fn short_text_is_unchanged() {
		assert_eq!(fit_label("nginx", 200.0, 13.0), "nginx");
		assert_eq!(fit_label("", 10.0, 13.0), "");
	}

	#[test]
	fn non_positive_width_is_empty() {
		assert_eq!(fit_label(POD, 0.0, 13.0), "");
		assert_eq!(fit_label(POD, -4.0, 13.0), "");
	}

	#[test]
	fn budget_below_ellipsis_is_best_effort() {
		let fitted = fit_label(POD, 8.0, 13.0);
		assert!(ELLIPSIS.starts_with(&fitted));
		assert!(text_width(&fitted, 13.0) <= 8.0 + EPSILON);
	}

	#[test]
	fn cjk_glyphs_cost_a_full_em() {
		assert_eq!(text_width("命名空间", 12.0), 48.0);
		let fitted = fit_label("命名空间资源", 40.0, 10.0);
		assert!(fitted.ends_with(ELLIPSIS));
		assert!(text_width(&fitted, 10.0) <= 40.0 + EPSILON);
		assert!(fitted.starts_with("命名空"));
	}

	#[test]
	fn never_exceeds_budget() {
		for width in (10..300).step_by(7) {
			let fitted = fit_label(POD, width as f64, 12.0);
			assert!(
				text_width(&fitted, 12.0) <= width as f64 + EPSILON,
				"width {width}"
			);
		}
	}
}
