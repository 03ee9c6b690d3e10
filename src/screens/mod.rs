pub mod grades_table;
pub mod nav_menu;
pub mod settings;
pub mod student_portal;
pub mod tenant_select;

use iced::Color;

use crate::format::GradeClass;

pub use grades_table::grades_table_screen;
pub use nav_menu::nav_menu;
pub use settings::settings_screen;
pub use student_portal::student_portal_screen;
pub use tenant_select::tenant_select_screen;

/// Text colour for a grade band, matching the exported stylesheet.
pub fn grade_color(class: GradeClass) -> Color {
    match class {
        GradeClass::Good => Color::from_rgb8(0x79, 0x74, 0x0e),
        GradeClass::Medium => Color::from_rgb8(0xb5, 0x76, 0x14),
        GradeClass::Poor => Color::from_rgb8(0x9d, 0x00, 0x06),
    }
}
