use super::Layout;
use crate::models::Window;
use crate::native::{NativeApi, Rect};

/// Layout which gives each window full height, but splits the workspace
/// width among them all.
#[derive(Debug, Default, Clone, Copy)]
pub struct EvenHorizontal;

impl Layout for EvenHorizontal {
    fn layout_name(&self) -> &'static str {
        super::EVEN_HORIZONTAL
    }

    fn reposition(&mut self, windows: &[&Window], area: Rect, api: &mut dyn NativeApi) {
        if windows.is_empty() {
            return;
        }
        let width = area.width / windows.len() as i32;
        let mut x = area.x;
        for window in windows {
            api.set_frame(window.handle, Rect::new(x, area.y, width, area.height));
            x += width;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::program_rule::{ProgramRule, Rule};
    use crate::models::WindowHandle;
    use crate::native::{MockNativeApi, MockWindow, NativeWindowInfo, WindowExStyle, WindowStyle};

    #[test]
    fn splits_the_working_area_evenly() {
        let mut api = MockNativeApi::new();
        let mut windows = vec![];
        for handle in 1..=2 {
            api.add_window(WindowHandle(handle), MockWindow::with_class("Notepad"));
            let info = NativeWindowInfo {
                handle: WindowHandle(handle),
                class_name: "Notepad".to_owned(),
                title: String::new(),
                process_name: "notepad".to_owned(),
                style: WindowStyle::CAPTION,
                ex_style: WindowExStyle::APP_WINDOW,
            };
            windows.push(Window::new(
                info,
                1,
                vec![],
                &Rule::default(),
                &ProgramRule::default(),
            ));
        }
        let refs: Vec<&Window> = windows.iter().collect();

        EvenHorizontal.reposition(&refs, Rect::new(0, 0, 1000, 500), &mut api);

        assert_eq!(api.frame(WindowHandle(1)), Some(Rect::new(0, 0, 500, 500)));
        assert_eq!(
            api.frame(WindowHandle(2)),
            Some(Rect::new(500, 0, 500, 500))
        );
    }
}
