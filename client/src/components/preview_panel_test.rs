use super::*;

#[test]
fn mode_labels_name_speed_tradeoff() {
    assert_eq!(mode_button_label(PreviewMode::Html), "HTML (Fast)");
    assert_eq!(mode_button_label(PreviewMode::Pdf), "PDF (Accurate)");
}
