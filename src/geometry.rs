use opencv::core::Rect;

/// 2点間のユークリッド距離
pub fn distance(a: [f32; 2], b: [f32; 2]) -> f32 {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    (dx * dx + dy * dy).sqrt()
}

/// 矩形の中心座標
pub fn rect_center(rect: Rect) -> [f32; 2] {
    [
        rect.x as f32 + rect.width as f32 / 2.0,
        rect.y as f32 + rect.height as f32 / 2.0,
    ]
}

/// 両目の中心間距離（ピクセル）
///
/// 目の矩形がちょうど2つ検出された場合のみ値を返す。
/// それ以外は「結果なし」であってエラーではない。
pub fn inter_eye_distance(eyes: &[Rect]) -> Option<f32> {
    if eyes.len() == 2 {
        Some(distance(rect_center(eyes[0]), rect_center(eyes[1])))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_symmetric() {
        let a = [1.0, 2.0];
        let b = [4.0, 6.0];
        assert_eq!(distance(a, b), distance(b, a));
        assert_eq!(distance(a, b), 5.0);
    }

    #[test]
    fn test_distance_zero() {
        let p = [3.5, -1.25];
        assert_eq!(distance(p, p), 0.0);
    }

    #[test]
    fn test_rect_center() {
        let center = rect_center(Rect::new(10, 20, 40, 60));
        assert_eq!(center, [30.0, 50.0]);
    }

    #[test]
    fn test_inter_eye_distance_two_boxes() {
        let eyes = [Rect::new(0, 0, 10, 10), Rect::new(30, 0, 10, 10)];
        let d = inter_eye_distance(&eyes).unwrap();
        assert!((d - 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_inter_eye_distance_wrong_count() {
        assert_eq!(inter_eye_distance(&[]), None);
        assert_eq!(inter_eye_distance(&[Rect::new(0, 0, 10, 10)]), None);
        let three = [
            Rect::new(0, 0, 10, 10),
            Rect::new(20, 0, 10, 10),
            Rect::new(40, 0, 10, 10),
        ];
        assert_eq!(inter_eye_distance(&three), None);
    }
}
