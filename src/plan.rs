use crate::detect::{AgeBracket, Gender};
use crate::somatotype::Build;

/// 最高齢区分に対する定型メッセージ
pub const NOT_FIT_MESSAGE: &str = "not fit for exercise, consult a doctor";

/// 割り当てられた運動リストとスピニングバイクの目標ケイデンス
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub exercises: Vec<&'static str>,
    pub rpm_target: i32,
}

/// (年齢区分, 性別, 体型) から運動プランを決める
///
/// ルールはこの順に評価され、後のルールが前の結果を上書きする:
/// 1. 60-100 は運動不適。メッセージとケイデンス0を返して終了。
/// 2. 体型ごとの基本割り当て。
/// 3. Mujer なら Yoga を追加しケイデンス -10。
/// 4. 48-53 または 38-43 なら 2〜3 の結果を破棄して
///    Moderate walking / Yoga、ケイデンス50に置き換え。
///
/// 身長は判定に使わないが、推定結果一式を渡す呼び出し側の
/// 対称性のため引数に残している。
pub fn recommend(age: AgeBracket, gender: Gender, build: Build, _height: f32) -> Plan {
    if age == AgeBracket::Senior {
        return Plan {
            exercises: vec![NOT_FIT_MESSAGE],
            rpm_target: 0,
        };
    }

    let (mut exercises, mut rpm_target) = match build {
        Build::Endomorfo => (vec!["Light walking", "Soft cycling"], 60),
        Build::Mesomorfo => (vec!["Running", "Moderate cycling", "Weight lifting"], 80),
        Build::Ectomorfo => (vec!["Sprints", "Intense cycling", "Resistance exercises"], 100),
    };

    if gender == Gender::Mujer {
        exercises.push("Yoga");
        rpm_target -= 10;
    }

    if age == AgeBracket::MiddleAged || age == AgeBracket::Adult {
        exercises = vec!["Moderate walking", "Yoga"];
        rpm_target = 50;
    }

    Plan {
        exercises,
        rpm_target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_senior_overrides_everything() {
        for build in [Build::Endomorfo, Build::Mesomorfo, Build::Ectomorfo] {
            for gender in [Gender::Hombre, Gender::Mujer] {
                let plan = recommend(AgeBracket::Senior, gender, build, 1.7);
                assert_eq!(plan.exercises, vec![NOT_FIT_MESSAGE]);
                assert_eq!(plan.rpm_target, 0);
            }
        }
    }

    #[test]
    fn test_base_assignment_by_build() {
        let plan = recommend(AgeBracket::YoungAdult, Gender::Hombre, Build::Endomorfo, 1.7);
        assert_eq!(plan.exercises, vec!["Light walking", "Soft cycling"]);
        assert_eq!(plan.rpm_target, 60);

        let plan = recommend(AgeBracket::YoungAdult, Gender::Hombre, Build::Ectomorfo, 1.7);
        assert_eq!(
            plan.exercises,
            vec!["Sprints", "Intense cycling", "Resistance exercises"]
        );
        assert_eq!(plan.rpm_target, 100);
    }

    #[test]
    fn test_female_adjustment() {
        let plan = recommend(AgeBracket::YoungAdult, Gender::Mujer, Build::Mesomorfo, 1.6);
        assert_eq!(
            plan.exercises,
            vec!["Running", "Moderate cycling", "Weight lifting", "Yoga"]
        );
        assert_eq!(plan.rpm_target, 70);
    }

    #[test]
    fn test_middle_age_override_discards_prior_rules() {
        // 48-53 は体型の割り当てを丸ごと置き換える
        let plan = recommend(AgeBracket::MiddleAged, Gender::Hombre, Build::Ectomorfo, 1.8);
        assert_eq!(plan.exercises, vec!["Moderate walking", "Yoga"]);
        assert_eq!(plan.rpm_target, 50);

        // 38-43 の女性でもケイデンス調整ごと上書きされる
        let plan = recommend(AgeBracket::Adult, Gender::Mujer, Build::Endomorfo, 1.6);
        assert_eq!(plan.exercises, vec!["Moderate walking", "Yoga"]);
        assert_eq!(plan.rpm_target, 50);
    }
}
