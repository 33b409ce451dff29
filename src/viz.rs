//! Render the dashboard cards to an **SVG** image.
//!
//! - One card per record, laid out on a grid (`width / CARD_MIN_WIDTH_PX` columns)
//! - Two progress bars per card (smart score in blue, sustainability in green)
//! - Header with the year filter and the summary numbers
//!
//! Text is emitted as SVG `<text>` elements, so no font has to be available at render time.

use crate::card::{self, CardView};
use crate::format;
use crate::stats::DashboardView;
use anyhow::{Result, anyhow, bail};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

pub const CARD_MIN_WIDTH_PX: u32 = 320;
pub const CARD_HEIGHT_PX: u32 = 150;
const HEADER_HEIGHT_PX: u32 = 70;

/// Office palette blue (#4472C4) and green (#70AD47).
const SMART_COLOR: RGBColor = RGBColor(68, 114, 196);
const SUSTAINABLE_COLOR: RGBColor = RGBColor(112, 173, 71);
const TRACK_COLOR: RGBColor = RGBColor(230, 230, 230);
const BORDER_COLOR: RGBColor = RGBColor(165, 165, 165);

/// Heuristic: estimate pixel width of text (Plotters has no built-in text measuring).
fn estimate_text_width_px(text: &str, font_px: u32) -> u32 {
    ((text.chars().count() as f32) * (font_px as f32) * 0.60).ceil() as u32
}

/// Truncate to fit `max_px` and add a single ellipsis if needed.
fn truncate_to_width(text: &str, font_px: u32, max_px: u32) -> String {
    if estimate_text_width_px(text, font_px) <= max_px {
        return text.to_string();
    }
    let mut out = String::new();
    for ch in text.chars() {
        out.push(ch);
        if estimate_text_width_px(&out, font_px) + font_px > max_px {
            out.pop();
            break;
        }
    }
    out.push('…');
    out
}

/// Draw every card of `view` into an SVG file `width` pixels wide.
pub fn plot_cards<P: AsRef<Path>>(
    view: &DashboardView<'_>,
    out_path: P,
    width: u32,
    locale_tag: &str,
) -> Result<()> {
    if view.records.is_empty() {
        return Err(anyhow!("no records to plot"));
    }
    let out_path = out_path.as_ref();
    let is_svg = out_path
        .extension()
        .and_then(|s| s.to_str())
        .map(|e| e.eq_ignore_ascii_case("svg"))
        .unwrap_or(false);
    if !is_svg {
        bail!("unsupported chart format for {} (expected .svg)", out_path.display());
    }

    let width = width.max(CARD_MIN_WIDTH_PX);
    let cols = (width / CARD_MIN_WIDTH_PX).max(1) as usize;
    let rows = view.records.len().div_ceil(cols);
    let height = HEADER_HEIGHT_PX + rows as u32 * CARD_HEIGHT_PX;

    let root = SVGBackend::new(out_path, (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let (header, body) = root.split_vertically(HEADER_HEIGHT_PX);
    draw_header(&header, view, locale_tag)?;

    let cells = body.split_evenly((rows, cols));
    for (cell, record) in cells.iter().zip(view.records.iter()) {
        draw_card(cell, &card::render_card_locale(record, locale_tag))?;
    }

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    log::info!("wrote {} cards to {}", view.records.len(), out_path.display());
    Ok(())
}

fn draw_header<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    view: &DashboardView<'_>,
    locale_tag: &str,
) -> Result<()> {
    let title_style =
        TextStyle::from((FontFamily::SansSerif, 22u32)).pos(Pos::new(HPos::Left, VPos::Top));
    let line_style =
        TextStyle::from((FontFamily::SansSerif, 14u32)).pos(Pos::new(HPos::Left, VPos::Top));
    area.draw(&Text::new(
        format!("Indicator dashboard ({})", view.filter),
        (16, 10),
        title_style,
    ))
    .map_err(|e| anyhow!("{:?}", e))?;
    area.draw(&Text::new(
        format!(
            "Regions: {}   Mean smart score: {}   Mean sustainability score: {}",
            format::format_count(view.summary.count, locale_tag),
            format::format_percent(view.summary.mean_smart_pct, locale_tag),
            format::format_percent(view.summary.mean_sustainable_pct, locale_tag),
        ),
        (16, 42),
        line_style,
    ))
    .map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

fn draw_card<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, view: &CardView) -> Result<()> {
    let (w_u32, h_u32) = area.dim_in_pixel();
    let (w, h) = (w_u32 as i32, h_u32 as i32);

    // Layout constants
    let margin: i32 = 8;
    let pad: i32 = 12;
    let title_px: u32 = 16;
    let text_px: u32 = 12;
    let bar_h: i32 = 10;
    let label_w: i32 = 110;
    let value_w: i32 = 56;

    area.draw(&Rectangle::new(
        [(margin, margin), (w - margin, h - margin)],
        BORDER_COLOR.stroke_width(1),
    ))
    .map_err(|e| anyhow!("{:?}", e))?;

    let left = margin + pad;
    let inner_w = (w - 2 * (margin + pad)).max(40);
    let top_style =
        TextStyle::from((FontFamily::SansSerif, title_px)).pos(Pos::new(HPos::Left, VPos::Top));
    let text_style =
        TextStyle::from((FontFamily::SansSerif, text_px)).pos(Pos::new(HPos::Left, VPos::Center));

    let title = truncate_to_width(&view.title, title_px, inner_w as u32);
    area.draw(&Text::new(title, (left, margin + pad), top_style))
        .map_err(|e| anyhow!("{:?}", e))?;
    area.draw(&Text::new(
        format!("Year: {}", view.year),
        (left, margin + pad + title_px as i32 + 10),
        text_style.clone(),
    ))
    .map_err(|e| anyhow!("{:?}", e))?;

    let bars = [
        ("Smart score", view.smart_pct, view.smart_label(), SMART_COLOR),
        ("Sustainability", view.sustainable_pct, view.sustainable_label(), SUSTAINABLE_COLOR),
    ];
    let bar_x0 = left + label_w;
    let bar_x1 = (left + inner_w - value_w).max(bar_x0 + 10);
    for (i, (label, pct, pct_label, color)) in bars.iter().enumerate() {
        let y = margin + pad + title_px as i32 + 34 + i as i32 * 22;
        area.draw(&Text::new(*label, (left, y), text_style.clone()))
            .map_err(|e| anyhow!("{:?}", e))?;
        area.draw(&Rectangle::new(
            [(bar_x0, y - bar_h / 2), (bar_x1, y + bar_h / 2)],
            TRACK_COLOR.filled(),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
        let filled = ((bar_x1 - bar_x0) as f64 * pct.clamp(0.0, 100.0) / 100.0).round() as i32;
        if filled > 0 {
            area.draw(&Rectangle::new(
                [(bar_x0, y - bar_h / 2), (bar_x0 + filled, y + bar_h / 2)],
                color.filled(),
            ))
            .map_err(|e| anyhow!("{:?}", e))?;
        }
        area.draw(&Text::new(pct_label.as_str(), (bar_x1 + 6, y), text_style.clone()))
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    let details = format!(
        "HDI {} · Life exp. {} · HDI income {}",
        view.hdi, view.life_expectancy, view.hdi_income
    );
    area.draw(&Text::new(
        truncate_to_width(&details, text_px, inner_w as u32),
        (left, h - margin - pad - 4),
        text_style,
    ))
    .map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_adds_ellipsis() {
        let s = truncate_to_width("Região Metropolitana de Belo Horizonte", 16, 120);
        assert!(s.ends_with('…'));
        assert!(estimate_text_width_px(&s, 16) <= 120);
        assert_eq!(truncate_to_width("Natal", 16, 120), "Natal");
    }
}
