use std::path::{Path, PathBuf};
use std::sync::Arc;

use eframe::egui::{self, FontData, FontDefinitions, FontFamily};

// ---------------------------------------------------------------------------
// Japanese font fallback
// ---------------------------------------------------------------------------

/// Put a system CJK font in front of egui's built-in fonts so Japanese
/// headers and categories render. Without one egui shows empty boxes.
pub fn install_cjk_fonts(ctx: &egui::Context, preferred: Option<&Path>) {
    let Some((path, data)) = candidate_font_paths(preferred)
        .into_iter()
        .find_map(|path| std::fs::read(&path).ok().map(|data| (path, data)))
    else {
        log::warn!("No CJK font found; Japanese text will not render (set CJK_FONT_PATH)");
        return;
    };
    log::info!("Using CJK font {}", path.display());

    let mut fonts = FontDefinitions::default();
    fonts
        .font_data
        .insert("cjk".to_owned(), Arc::new(FontData::from_owned(data)));
    for family in [FontFamily::Proportional, FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .insert(0, "cjk".to_owned());
    }
    ctx.set_fonts(fonts);
}

fn candidate_font_paths(preferred: Option<&Path>) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = preferred.into_iter().map(Path::to_path_buf).collect();

    if let Ok(windir) = std::env::var("WINDIR") {
        let fonts_dir = PathBuf::from(windir).join("Fonts");
        for name in ["YuGothM.ttc", "meiryo.ttc", "msgothic.ttc"] {
            paths.push(fonts_dir.join(name));
        }
    }

    paths.extend(
        [
            "/System/Library/Fonts/ヒラギノ角ゴシック W3.ttc",
            "/System/Library/Fonts/Hiragino Sans W3.ttc",
            "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/truetype/noto/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
        ]
        .map(PathBuf::from),
    );
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preferred_font_is_tried_first() {
        let paths = candidate_font_paths(Some(Path::new("/opt/fonts/jp.otf")));
        assert_eq!(paths[0], PathBuf::from("/opt/fonts/jp.otf"));
        assert!(paths.len() > 1);
    }
}
