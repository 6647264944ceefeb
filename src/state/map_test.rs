use super::*;

#[test]
fn default_view_is_oahu() {
    let view = MapViewState::default();
    assert!((view.longitude - -157.9).abs() < f64::EPSILON);
    assert!((view.latitude - 21.5).abs() < f64::EPSILON);
    assert!((view.zoom - 9.0).abs() < f64::EPSILON);
}

#[test]
fn patch_touches_only_named_fields() {
    let mut view = MapViewState::default();
    view.apply(MapViewPatch { zoom: Some(11.5), ..MapViewPatch::default() });
    assert!((view.zoom - 11.5).abs() < f64::EPSILON);
    assert!((view.longitude - -157.9).abs() < f64::EPSILON);
    assert!((view.latitude - 21.5).abs() < f64::EPSILON);
}

#[test]
fn empty_patch_is_noop() {
    let mut view = MapViewState { longitude: -158.0, latitude: 21.6, zoom: 10.0 };
    let before = view;
    view.apply(MapViewPatch::default());
    assert_eq!(view, before);
}

#[test]
fn centered_on_uses_fly_to_zoom() {
    let view = MapViewState::centered_on(Coordinates { latitude: 21.27, longitude: -157.69 });
    assert!((view.latitude - 21.27).abs() < f64::EPSILON);
    assert!((view.longitude - -157.69).abs() < f64::EPSILON);
    assert!((view.zoom - FLY_TO_ZOOM).abs() < f64::EPSILON);
}
