use dms::landmarks::{LANDMARK_COUNT, LEFT_EYE, RIGHT_EYE};
use dms::{LandmarkSet, Point};

/// Six eye points of width 10 whose lid pairs sit `opening` apart,
/// giving an EAR of `opening / 10`.
fn eye(cx: f32, cy: f32, opening: f32) -> [Point; 6] {
    let h = opening / 2.0;
    [
        Point::new(cx - 5.0, cy),
        Point::new(cx - 2.0, cy - h),
        Point::new(cx + 2.0, cy - h),
        Point::new(cx + 5.0, cy),
        Point::new(cx + 2.0, cy + h),
        Point::new(cx - 2.0, cy + h),
    ]
}

/// A synthetic face centred near `(cx, cy)` with both eyes at the given EAR
pub fn face(cx: f32, cy: f32, ear: f32) -> LandmarkSet {
    let mut points = vec![Point::new(cx, cy); LANDMARK_COUNT];
    points[RIGHT_EYE].copy_from_slice(&eye(cx - 20.0, cy, ear * 10.0));
    points[LEFT_EYE].copy_from_slice(&eye(cx + 20.0, cy, ear * 10.0));
    LandmarkSet::new(points).unwrap()
}
