use std::f32::consts::FRAC_PI_2;

use eframe::egui::{
    self, Color32, ColorImage, FontId, RichText, Sense, TextureHandle, TextureOptions, Ui,
    epaint::TextShape, load::SizedTexture,
};
use egui_extras::{Size, StripBuilder};
use egui_plot::{Arrows, Plot, PlotImage, PlotPoint, PlotPoints};
use image::RgbaImage;

use crate::color::ColormapKind;
use crate::data::contour::{ContourFill, ContourLevels};
use crate::data::model::{CoordinateGrid, MaskedField};
use crate::data::quiver::QuiverArrow;

const COLOR_BAR_WIDTH: f32 = 78.0;

// ---------------------------------------------------------------------------
// Texture construction
// ---------------------------------------------------------------------------

/// Paint each cell with its band colour; masked cells are transparent.
pub fn fill_image(fill: &ContourFill, colormap: ColormapKind) -> ColorImage {
    let palette: Vec<Color32> = (0..fill.levels.band_count())
        .map(|band| colormap.sample(fill.levels.band_position(band)))
        .collect();

    let mut rgba = Vec::with_capacity(fill.bands.len() * 4);
    for band in &fill.bands {
        let c = band.map_or(Color32::TRANSPARENT, |b| palette[b]);
        rgba.extend_from_slice(&c.to_srgba_unmultiplied());
    }
    ColorImage::from_rgba_unmultiplied([fill.width, fill.height], &rgba)
}

/// Upload the reference raster as-is.
pub fn reference_texture(ctx: &egui::Context, name: &str, img: &RgbaImage) -> TextureHandle {
    let size = [img.width() as usize, img.height() as usize];
    let color_image = ColorImage::from_rgba_unmultiplied(size, img.as_raw());
    ctx.load_texture(name, color_image, TextureOptions::LINEAR)
}

// ---------------------------------------------------------------------------
// ContourPanel – one pre-rendered filled contour
// ---------------------------------------------------------------------------

/// A filled contour texture plus what its colour bar needs.
pub struct ContourPanel {
    pub id: &'static str,
    pub texture: TextureHandle,
    pub levels: ContourLevels,
    pub colormap: ColormapKind,
}

impl ContourPanel {
    pub fn new(
        ctx: &egui::Context,
        id: &'static str,
        field: &MaskedField,
        level_count: usize,
        colormap: ColormapKind,
    ) -> Self {
        let fill = ContourFill::new(field, level_count);
        log::debug!(
            "{id}: {} bands, {} filled cells, colour map {}",
            fill.levels.band_count(),
            fill.filled_count(),
            colormap.name()
        );
        let texture = ctx.load_texture(id, fill_image(&fill, colormap), TextureOptions::NEAREST);
        Self {
            id,
            texture,
            levels: fill.levels,
            colormap,
        }
    }
}

// ---------------------------------------------------------------------------
// Panels
// ---------------------------------------------------------------------------

/// First panel: the raw reference image under its file name.
pub fn reference_panel(ui: &mut Ui, title: &str, texture: &TextureHandle) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(title).size(16.0));
        ui.add(
            egui::Image::from_texture(SizedTexture::from_handle(texture))
                .maintain_aspect_ratio(true)
                .shrink_to_fit(),
        );
    });
}

/// Filled contour with its colour bar. Returns the pointer position in
/// plot coordinates while hovered.
pub fn contour_panel(
    ui: &mut Ui,
    panel: &ContourPanel,
    label: &str,
    grid: &CoordinateGrid,
    arrows: Option<&[QuiverArrow]>,
) -> Option<[f64; 2]> {
    let mut hovered = None;
    StripBuilder::new(ui)
        .size(Size::remainder())
        .size(Size::exact(COLOR_BAR_WIDTH))
        .horizontal(|mut strip| {
            strip.cell(|ui: &mut Ui| {
                hovered = contour_plot(ui, panel, grid, arrows);
            });
            strip.cell(|ui: &mut Ui| {
                color_bar(ui, &panel.levels, panel.colormap, label);
            });
        });
    hovered
}

fn contour_plot(
    ui: &mut Ui,
    panel: &ContourPanel,
    grid: &CoordinateGrid,
    arrows: Option<&[QuiverArrow]>,
) -> Option<[f64; 2]> {
    let aspect = grid.xp.dims().aspect();
    let (dx, dy) = grid.spacing();
    // Cell centres sit on the grid points, so the image overhangs by half a cell.
    let size = egui::vec2((1.0 + dx) as f32, (aspect + dy) as f32);
    let center = PlotPoint::new(0.5, aspect / 2.0);

    Plot::new(panel.id)
        .data_aspect(1.0)
        .show_grid(false)
        .include_x(-dx / 2.0)
        .include_x(1.0 + dx / 2.0)
        .include_y(-dy / 2.0)
        .include_y(aspect + dy / 2.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.image(PlotImage::new(panel.texture.id(), center, size));

            if let Some(arrows) = arrows.filter(|a| !a.is_empty()) {
                let origins: PlotPoints = arrows.iter().map(|a| a.origin).collect();
                let tips: PlotPoints = arrows.iter().map(|a| a.tip).collect();
                plot_ui.arrows(Arrows::new(origins, tips).color(Color32::WHITE));
            }

            plot_ui.pointer_coordinate().map(|p| [p.x, p.y])
        })
        .inner
}

/// Vertical colour bar: one swatch per band, min/mid/max ticks and a
/// label reading bottom to top.
pub fn color_bar(ui: &mut Ui, levels: &ContourLevels, colormap: ColormapKind, label: &str) {
    let text_color = ui.visuals().text_color();
    let (rect, _) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
    let painter = ui.painter_at(rect);

    let bar = egui::Rect::from_min_size(
        rect.left_top() + egui::vec2(2.0, 8.0),
        egui::vec2(14.0, (rect.height() - 16.0).max(0.0)),
    );

    let (min, max) = match levels.range() {
        Some(range) if !levels.is_empty() => range,
        _ => {
            painter.text(
                bar.left_center(),
                egui::Align2::LEFT_CENTER,
                "no data",
                FontId::proportional(11.0),
                text_color,
            );
            return;
        }
    };

    let bands = levels.band_count();
    let band_height = bar.height() / bands as f32;
    for band in 0..bands {
        let bottom = bar.bottom() - band as f32 * band_height;
        let swatch = egui::Rect::from_x_y_ranges(bar.x_range(), (bottom - band_height)..=bottom);
        painter.rect_filled(swatch, 0.0, colormap.sample(levels.band_position(band)));
    }

    for (frac, value) in [(0.0, min), (0.5, (min + max) / 2.0), (1.0, max)] {
        let y = bar.bottom() - frac * bar.height();
        painter.text(
            egui::pos2(bar.right() + 3.0, y),
            egui::Align2::LEFT_CENTER,
            format!("{value:.2e}"),
            FontId::proportional(10.0),
            text_color,
        );
    }

    let galley = painter.layout_no_wrap(label.to_owned(), FontId::proportional(14.0), text_color);
    let pos = egui::pos2(
        rect.right() - galley.size().y,
        bar.center().y + galley.size().x / 2.0,
    );
    painter.add(TextShape::new(pos, galley, text_color).with_angle(-FRAC_PI_2));
}
