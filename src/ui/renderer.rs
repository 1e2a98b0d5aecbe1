//! Raster rendering of screens
//!
//! Layout calculation is separated from rasterization: `ScreenLayout` turns a
//! `Screen` into positioned panels, markers and text runs, and
//! `ScreenRenderer` paints them with tiny-skia. Glyphs are rasterized with
//! ab_glyph when a font is loaded; otherwise text is drawn as placeholder bars.

use std::path::Path;

use ab_glyph::{Font, FontArc, GlyphId, PxScale, ScaleFont, point};
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Rect as SkiaRect, Stroke, Transform};
use tracing::debug;

use crate::config::RenderConfig;
use crate::ui::journey::{JourneyStage, PhaseView};
use crate::ui::view::{LoginView, PlatformView, Screen, WelcomeView};

/// Rendering errors
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error("Failed to create pixmap for rendering")]
    PixmapCreationFailed,

    #[error("Invalid canvas dimensions: {width}x{height}")]
    InvalidCanvasDimensions { width: u32, height: u32 },

    #[error("Failed to read font {path}: {source}")]
    FontRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Font data is not a valid TrueType/OpenType font")]
    InvalidFont,

    #[error("Failed to encode PNG: {0}")]
    Encode(String),
}

mod palette {
    use tiny_skia::Color;

    pub fn background() -> Color {
        Color::from_rgba8(15, 23, 42, 255)
    }
    pub fn surface() -> Color {
        Color::from_rgba8(30, 41, 59, 255)
    }
    pub fn surface_raised() -> Color {
        Color::from_rgba8(51, 65, 85, 255)
    }
    pub fn accent() -> Color {
        Color::from_rgba8(56, 189, 248, 255)
    }
    pub fn text() -> Color {
        Color::from_rgba8(226, 232, 240, 255)
    }
    pub fn muted() -> Color {
        Color::from_rgba8(148, 163, 184, 255)
    }
    pub fn solution() -> Color {
        Color::from_rgba8(34, 197, 94, 255)
    }
    pub fn error() -> Color {
        Color::from_rgba8(248, 113, 113, 255)
    }
}

/// Filled rectangle with an optional outline
#[derive(Debug, Clone)]
pub struct Panel {
    pub rect: SkiaRect,
    pub fill: Color,
    pub border: Option<Color>,
}

/// Filled circle, used for progress dots and toggle indicators
#[derive(Debug, Clone)]
pub struct Marker {
    pub cx: f32,
    pub cy: f32,
    pub radius: f32,
    pub color: Color,
}

/// A single line of text; `y` is the baseline
#[derive(Debug, Clone)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: Color,
}

/// Pre-calculated layout for one screen
#[derive(Debug, Clone)]
pub struct ScreenLayout {
    pub panels: Vec<Panel>,
    pub markers: Vec<Marker>,
    pub texts: Vec<TextRun>,
    pub canvas_width: f32,
    pub canvas_height: f32,
}

impl ScreenLayout {
    /// Create a layout for a screen on a canvas of the given size
    pub fn from_screen(screen: &Screen, width: u32, height: u32) -> Self {
        let mut layout = Self {
            panels: Vec::new(),
            markers: Vec::new(),
            texts: Vec::new(),
            canvas_width: width as f32,
            canvas_height: height as f32,
        };
        let scale = (layout.canvas_width / 1280.0)
            .min(layout.canvas_height / 800.0)
            .max(0.25);

        match screen {
            Screen::Welcome(view) => layout.layout_welcome(view, scale),
            Screen::Login(view) => layout.layout_login(view, scale),
            Screen::Platform(view) => layout.layout_platform(view, scale),
            Screen::Journey(view) => layout.layout_journey(view, scale),
        }

        layout
    }

    fn panel(&mut self, x: f32, y: f32, w: f32, h: f32, fill: Color, border: Option<Color>) {
        if let Some(rect) = SkiaRect::from_xywh(x, y, w, h) {
            self.panels.push(Panel { rect, fill, border });
        }
    }

    fn text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color) {
        let fitted = fit_text(text, self.canvas_width - x, size);
        if !fitted.is_empty() {
            self.texts.push(TextRun { text: fitted, x, y, size, color });
        }
    }

    fn header(&mut self, title: &str, scale: f32) {
        self.panel(0.0, 0.0, self.canvas_width, 56.0 * scale, palette::surface(), None);
        self.text(title, 20.0 * scale, 36.0 * scale, 20.0 * scale, palette::text());
    }

    fn layout_welcome(&mut self, view: &WelcomeView, s: f32) {
        let x = self.canvas_width * 0.1;
        let mut y = self.canvas_height * 0.32;
        self.text(view.title, x, y, 36.0 * s, palette::text());
        y += 40.0 * s;
        self.text(view.tagline, x, y, 16.0 * s, palette::muted());
        y += 48.0 * s;

        let card_w = self.canvas_width * 0.36;
        for (index, (key, label)) in view.options.iter().enumerate() {
            let card_x = x + index as f32 * (card_w + 24.0 * s);
            self.panel(card_x, y, card_w, 96.0 * s, palette::surface(), Some(palette::accent()));
            self.text(label, card_x + 20.0 * s, y + 44.0 * s, 20.0 * s, palette::text());
            self.text(&format!("start {}", key), card_x + 20.0 * s, y + 72.0 * s, 13.0 * s, palette::muted());
        }

        if let Some(name) = &view.signed_in_as {
            self.text(&format!("Signed in as {}", name), x, y + 132.0 * s, 14.0 * s, palette::solution());
        }
    }

    fn layout_login(&mut self, view: &LoginView, s: f32) {
        self.header("Manufacturing Intelligence Platform", s);
        let w = 420.0 * s;
        let h = 260.0 * s;
        let x = (self.canvas_width - w) / 2.0;
        let mut y = (self.canvas_height - h) / 2.0;
        self.panel(x, y, w, h, palette::surface(), Some(palette::surface_raised()));

        y += 44.0 * s;
        self.text("Sign in", x + 24.0 * s, y, 24.0 * s, palette::text());
        if let Some(error) = &view.error {
            y += 30.0 * s;
            self.text(error, x + 24.0 * s, y, 13.0 * s, palette::error());
        }
        y += 34.0 * s;
        self.text("Demo accounts", x + 24.0 * s, y, 14.0 * s, palette::muted());
        for hint in &view.account_hints {
            y += 24.0 * s;
            if y > self.canvas_height {
                break;
            }
            self.text(&format!("login {}", hint), x + 36.0 * s, y, 14.0 * s, palette::accent());
        }
    }

    fn layout_platform(&mut self, view: &PlatformView, s: f32) {
        self.header("Manufacturing Intelligence Platform", s);
        let user_label = format!("{} ({})", view.user_name, view.role);
        self.text(&user_label, self.canvas_width - 300.0 * s, 36.0 * s, 14.0 * s, palette::muted());

        // Sidebar navigation
        let top = 56.0 * s;
        let sidebar_w = 230.0 * s;
        self.panel(0.0, top, sidebar_w, self.canvas_height - top, palette::surface(), None);
        let mut y = top + 16.0 * s;
        for entry in &view.nav {
            if entry.active {
                self.panel(8.0 * s, y, sidebar_w - 16.0 * s, 32.0 * s, palette::surface_raised(), Some(palette::accent()));
            }
            let color = if entry.active { palette::accent() } else { palette::text() };
            self.text(entry.label, 20.0 * s, y + 21.0 * s, 14.0 * s, color);
            y += 40.0 * s;
        }

        y += 16.0 * s;
        self.text("Solutions", 20.0 * s, y, 12.0 * s, palette::muted());
        for toggle in &view.solutions {
            y += 24.0 * s;
            let color = if toggle.enabled { palette::solution() } else { palette::surface_raised() };
            self.markers.push(Marker {
                cx: 26.0 * s,
                cy: y - 4.0 * s,
                radius: 5.0 * s,
                color,
            });
            self.text(&toggle.name, 40.0 * s, y, 12.0 * s, palette::text());
        }

        // Page content
        let page = &view.page;
        let x = sidebar_w + 28.0 * s;
        let content_w = self.canvas_width - x - 28.0 * s;
        let mut y = top + 44.0 * s;
        self.text(page.title, x, y, 26.0 * s, palette::text());
        y += 24.0 * s;
        self.text(page.subtitle, x, y, 14.0 * s, palette::muted());
        if page.status.refreshing {
            self.text("Refreshing...", x + content_w - 120.0 * s, y, 12.0 * s, palette::accent());
        } else if page.status.exporting {
            self.text("Exporting...", x + content_w - 120.0 * s, y, 12.0 * s, palette::accent());
        }
        y += 20.0 * s;

        for section in &page.sections {
            let card_h = (40.0 + 22.0 * section.rows.len() as f32) * s;
            if y + card_h > self.canvas_height {
                debug!(heading = %section.heading, "section does not fit canvas, skipped");
                break;
            }
            let border = section.solution.map(|_| palette::solution());
            self.panel(x, y, content_w, card_h, palette::surface(), border);
            self.text(&section.heading, x + 16.0 * s, y + 26.0 * s, 16.0 * s, palette::text());
            let mut row_y = y + 26.0 * s;
            for row in &section.rows {
                row_y += 22.0 * s;
                self.text(row, x + 24.0 * s, row_y, 13.0 * s, palette::muted());
            }
            y += card_h + 16.0 * s;
        }
    }

    fn layout_journey(&mut self, view: &PhaseView, s: f32) {
        self.header("Customer Journey", s);

        // Progress dots, one per stage
        let margin = 80.0 * s;
        let step = (self.canvas_width - 2.0 * margin) / (JourneyStage::ALL.len() - 1) as f32;
        let progress_y = 104.0 * s;
        for (index, stage) in JourneyStage::ALL.iter().enumerate() {
            let cx = margin + step * index as f32;
            let reached = index < usize::from(view.phase.get());
            self.markers.push(Marker {
                cx,
                cy: progress_y,
                radius: 10.0 * s,
                color: if reached { palette::accent() } else { palette::surface_raised() },
            });
            let color = if *stage == view.stage { palette::text() } else { palette::muted() };
            self.text(stage.title(), cx - 40.0 * s, progress_y + 32.0 * s, 11.0 * s, color);
        }

        let x = margin;
        let width = self.canvas_width - 2.0 * margin;
        let mut y = 200.0 * s;
        self.text(&format!("Phase {}: {}", view.phase, view.title), x, y, 28.0 * s, palette::text());
        for line in wrap(view.narrative, chars_per_line(width, 15.0 * s)) {
            y += 24.0 * s;
            self.text(&line, x, y, 15.0 * s, palette::muted());
        }

        y += 28.0 * s;
        let count = view.highlights.len().max(1) as f32;
        let card_w = (width - 16.0 * s * (count - 1.0)) / count;
        for (index, highlight) in view.highlights.iter().enumerate() {
            let card_x = x + index as f32 * (card_w + 16.0 * s);
            self.panel(card_x, y, card_w, 56.0 * s, palette::surface(), Some(palette::accent()));
            self.text(highlight, card_x + 14.0 * s, y + 34.0 * s, 14.0 * s, palette::text());
        }
        y += 80.0 * s;

        for line in &view.revealed {
            let bubble_h = 52.0 * s;
            if y + bubble_h > self.canvas_height {
                break;
            }
            self.panel(x, y, width, bubble_h, palette::surface_raised(), None);
            self.text(line.speaker, x + 14.0 * s, y + 20.0 * s, 12.0 * s, palette::accent());
            self.text(line.text, x + 14.0 * s, y + 40.0 * s, 14.0 * s, palette::text());
            y += bubble_h + 10.0 * s;
        }
    }
}

/// Approximate advance of one glyph at `size`
fn approx_char_width(size: f32) -> f32 {
    size * 0.55
}

fn chars_per_line(width: f32, size: f32) -> usize {
    ((width / approx_char_width(size)) as usize).max(8)
}

/// Truncates text that would run past `max_width`, adding an ellipsis
fn fit_text(text: &str, max_width: f32, size: f32) -> String {
    if max_width <= 0.0 {
        return String::new();
    }
    let max_chars = (max_width / approx_char_width(size)) as usize;
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars < 4 {
        return String::new();
    }
    let mut fitted: String = text.chars().take(max_chars - 3).collect();
    fitted.push_str("...");
    fitted
}

/// Greedy word wrap on whitespace
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Screen renderer using tiny-skia
pub struct ScreenRenderer {
    font: Option<FontArc>,
}

impl ScreenRenderer {
    /// Create a renderer without a font (placeholder text)
    pub fn new() -> Self {
        Self { font: None }
    }

    /// Create a renderer from raw font bytes
    pub fn with_font_bytes(bytes: Vec<u8>) -> Result<Self, RendererError> {
        let font = FontArc::try_from_vec(bytes).map_err(|_| RendererError::InvalidFont)?;
        Ok(Self { font: Some(font) })
    }

    /// Create a renderer using the configured font, if any
    pub fn from_config(config: &RenderConfig) -> Result<Self, RendererError> {
        match &config.font_path {
            Some(path) => {
                let bytes = std::fs::read(path).map_err(|source| RendererError::FontRead {
                    path: path.display().to_string(),
                    source,
                })?;
                debug!(path = %path.display(), "loaded render font");
                Self::with_font_bytes(bytes)
            }
            None => Ok(Self::new()),
        }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Render a screen layout to a pixmap
    pub fn render_layout(&self, layout: &ScreenLayout) -> Result<Pixmap, RendererError> {
        let (width, height) = (layout.canvas_width as u32, layout.canvas_height as u32);
        if width == 0 || height == 0 {
            return Err(RendererError::InvalidCanvasDimensions { width, height });
        }
        let mut pixmap = Pixmap::new(width, height).ok_or(RendererError::PixmapCreationFailed)?;
        pixmap.fill(palette::background());

        self.render_panels(&mut pixmap, &layout.panels);
        self.render_markers(&mut pixmap, &layout.markers);
        for run in &layout.texts {
            match &self.font {
                Some(font) => render_glyphs(&mut pixmap, font, run),
                None => render_placeholder(&mut pixmap, run),
            }
        }

        Ok(pixmap)
    }

    /// Lay out and render a screen
    pub fn render_screen(&self, screen: &Screen, width: u32, height: u32) -> Result<Pixmap, RendererError> {
        self.render_layout(&ScreenLayout::from_screen(screen, width, height))
    }

    /// Render a screen and write it as PNG
    pub fn render_to_png(
        &self,
        screen: &Screen,
        width: u32,
        height: u32,
        path: &Path,
    ) -> Result<(), RendererError> {
        let pixmap = self.render_screen(screen, width, height)?;
        pixmap
            .save_png(path)
            .map_err(|e| RendererError::Encode(e.to_string()))?;
        debug!(path = %path.display(), width, height, "screen written");
        Ok(())
    }

    fn render_panels(&self, pixmap: &mut Pixmap, panels: &[Panel]) {
        for panel in panels {
            let mut paint = Paint::default();
            paint.set_color(panel.fill);
            pixmap.fill_rect(panel.rect, &paint, Transform::identity(), None);

            if let Some(border) = panel.border {
                let path = PathBuilder::from_rect(panel.rect);
                let mut paint = Paint::default();
                paint.set_color(border);
                let stroke = Stroke {
                    width: 1.5,
                    ..Stroke::default()
                };
                pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
        }
    }

    fn render_markers(&self, pixmap: &mut Pixmap, markers: &[Marker]) {
        for marker in markers {
            let mut path_builder = PathBuilder::new();
            path_builder.push_circle(marker.cx, marker.cy, marker.radius);
            if let Some(path) = path_builder.finish() {
                let mut paint = Paint::default();
                paint.set_color(marker.color);
                paint.anti_alias = true;
                pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
            }
        }
    }
}

impl Default for ScreenRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn render_glyphs(pixmap: &mut Pixmap, font: &FontArc, run: &TextRun) {
    let scale = PxScale::from(run.size);
    let scaled = font.as_scaled(scale);
    let mut caret = run.x;
    let mut previous: Option<GlyphId> = None;

    for ch in run.text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(scale, point(caret, run.y));
        caret += scaled.h_advance(id);
        previous = Some(id);

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                blend_pixel(
                    pixmap,
                    bounds.min.x as i32 + gx as i32,
                    bounds.min.y as i32 + gy as i32,
                    run.color,
                    coverage,
                );
            });
        }
    }
}

/// Draws a bar roughly the size of the text when no font is available
fn render_placeholder(pixmap: &mut Pixmap, run: &TextRun) {
    let width = run.text.chars().count() as f32 * approx_char_width(run.size);
    let height = (run.size * 0.4).max(1.0);
    if let Some(rect) = SkiaRect::from_xywh(run.x, run.y - run.size * 0.55, width, height) {
        let mut paint = Paint::default();
        let mut color = run.color;
        color.apply_opacity(0.6);
        paint.set_color(color);
        pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    }
}

/// Source-over blend of a straight-alpha color into premultiplied RGBA
fn blend_pixel(pixmap: &mut Pixmap, x: i32, y: i32, color: Color, coverage: f32) {
    if x < 0 || y < 0 || x as u32 >= pixmap.width() || y as u32 >= pixmap.height() {
        return;
    }
    let alpha = (coverage * color.alpha()).clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }

    let index = ((y as u32 * pixmap.width() + x as u32) * 4) as usize;
    let data = pixmap.data_mut();
    for (offset, channel) in [color.red(), color.green(), color.blue()].into_iter().enumerate() {
        let dst = f32::from(data[index + offset]);
        data[index + offset] = (channel * alpha * 255.0 + dst * (1.0 - alpha)).round() as u8;
    }
    let dst_alpha = f32::from(data[index + 3]);
    data[index + 3] = (alpha * 255.0 + dst_alpha * (1.0 - alpha)).round() as u8;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::navigation::{PageKey, Phase};
    use crate::domain::user::Role;
    use crate::ui::journey::build_phase;
    use crate::ui::pages::{PageStatus, PageView, Section};
    use crate::ui::view::{NavEntry, SolutionToggle};

    fn platform_screen() -> Screen {
        Screen::Platform(PlatformView {
            user_name: "Morgan Reyes".to_string(),
            role: Role::Admin,
            nav: PageKey::ALL
                .iter()
                .map(|key| NavEntry {
                    key: *key,
                    label: key.label(),
                    active: *key == PageKey::Maintenance,
                })
                .collect(),
            solutions: vec![SolutionToggle {
                id: "predictive-maintenance".to_string(),
                name: "Predictive Maintenance".to_string(),
                enabled: true,
            }],
            page: PageView {
                key: PageKey::Maintenance,
                title: "Maintenance",
                subtitle: "Asset health",
                sections: vec![Section {
                    heading: "AI failure predictions".to_string(),
                    rows: vec!["Conveyor CV-12 gearbox".to_string()],
                    solution: Some("predictive-maintenance"),
                }],
                status: PageStatus::default(),
            },
        })
    }

    #[test]
    fn platform_layout_has_nav_and_sections() {
        let layout = ScreenLayout::from_screen(&platform_screen(), 1280, 800);
        let texts: Vec<_> = layout.texts.iter().map(|t| t.text.as_str()).collect();
        assert!(texts.contains(&"Maintenance"));
        assert!(texts.contains(&"AI failure predictions"));
        assert!(texts.contains(&"Morgan Reyes (admin)"));
        // Solution-unlocked section gets an outline
        assert!(layout.panels.iter().any(|p| p.border == Some(palette::solution())));
        assert_eq!(layout.markers.len(), 1);
    }

    #[test]
    fn journey_layout_marks_progress() {
        let view = build_phase(JourneyStage::Pilot, Phase::clamped(3), 2);
        let layout = ScreenLayout::from_screen(&Screen::Journey(view), 1280, 800);
        let reached = layout.markers.iter().filter(|m| m.color == palette::accent()).count();
        assert_eq!(layout.markers.len(), 6);
        assert_eq!(reached, 3);
    }

    #[test]
    fn layout_scales_with_canvas() {
        let small = ScreenLayout::from_screen(&platform_screen(), 640, 400);
        let large = ScreenLayout::from_screen(&platform_screen(), 2560, 1600);
        assert!(large.texts[0].size > small.texts[0].size);
    }

    #[test]
    fn long_text_is_truncated() {
        let fitted = fit_text(&"x".repeat(500), 100.0, 10.0);
        assert!(fitted.ends_with("..."));
        assert!(fitted.chars().count() <= 18);
        assert_eq!(fit_text("short", 100.0, 10.0), "short");
    }

    #[test]
    fn wrap_breaks_on_words() {
        let lines = wrap("one two three four five", 9);
        assert_eq!(lines, vec!["one two", "three", "four five"]);
    }

    #[test]
    fn render_produces_canvas_sized_pixmap() {
        let renderer = ScreenRenderer::new();
        let pixmap = renderer.render_screen(&platform_screen(), 640, 400).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (640, 400));
        assert_eq!(pixmap.data().len(), 640 * 400 * 4);
        // Something other than the background was painted
        let first = &pixmap.data()[..4];
        assert!(pixmap.data().chunks(4).any(|px| px != first));
    }

    #[test]
    fn png_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("screen.png");
        ScreenRenderer::new()
            .render_to_png(&platform_screen(), 320, 240, &path)
            .unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn invalid_font_bytes_are_rejected() {
        let result = ScreenRenderer::with_font_bytes(vec![0, 1, 2, 3]);
        assert!(matches!(result, Err(RendererError::InvalidFont)));
        assert!(!ScreenRenderer::new().has_font());
    }

    #[test]
    fn blend_ignores_out_of_bounds() {
        let mut pixmap = Pixmap::new(2, 2).unwrap();
        blend_pixel(&mut pixmap, -1, 0, palette::text(), 1.0);
        blend_pixel(&mut pixmap, 5, 5, palette::text(), 1.0);
        assert!(pixmap.data().iter().all(|b| *b == 0));

        blend_pixel(&mut pixmap, 1, 1, palette::text(), 1.0);
        assert_eq!(pixmap.data()[15], 255);
    }
}
