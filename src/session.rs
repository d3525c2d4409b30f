use anyhow::{Context, Result};
use std::time::Instant;

use crate::config::TimingConfig;
use crate::detect::{AgeBracket, Gender};
use crate::hand::Direction;
use crate::plan::{recommend, Plan};
use crate::somatotype::Build;

/// セッションの4フェーズ。厳密に一方向で、戻りはない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// 顔が現れるのを待ちつつ属性サンプルを収集
    Waiting,
    /// 全身が映るのを待ってから体型観測を収集
    Analyzing,
    /// 最頻値とプランを1tickで計算
    Displaying,
    /// 結果を表示しジェスチャで分岐を選ばせる（終端動作フェーズ）
    Choosing,
}

/// 受理されたフレーム1枚分の属性サンプル
///
/// 身長が得られないフレームはサンプルごと破棄される。欠損値を
/// 持つサンプルを混ぜると最頻値の縮約が壊れるため。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub age: AgeBracket,
    pub gender: Gender,
    pub height: f32,
}

/// Displaying 境界で確定する最頻値の集合。以後は不変。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Profile {
    pub age: AgeBracket,
    pub gender: Gender,
    pub height: f32,
    pub build: Build,
}

/// ジェスチャで選ばれた表示分岐
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// 左指差し: 目標ケイデンス表示
    CadenceView,
    /// 右指差し: 運動リスト表示
    ExerciseView,
}

/// 最頻値。同数の場合は先に現れた値が勝つ。
pub fn mode<T: PartialEq + Clone>(items: &[T]) -> Option<T> {
    let mut best: Option<(usize, usize)> = None;
    for i in 0..items.len() {
        let count = items.iter().filter(|x| **x == items[i]).count();
        // 厳密に多い場合のみ更新することで先着優先になる
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((i, count)),
        }
    }
    best.map(|(i, _)| items[i].clone())
}

/// フレームごとに1回進められるセッション状態機械
///
/// 時刻は引数で渡す。検出・推論は呼び出し側がフェーズに応じて
/// 実行し、結果だけをここに渡す。
pub struct Session {
    timing: TimingConfig,
    phase: Phase,
    phase_started: Option<Instant>,
    samples: Vec<Sample>,
    observations: Vec<Build>,
    profile: Option<Profile>,
    plan: Option<Plan>,
    choice: Option<Choice>,
}

impl Session {
    pub fn new(timing: TimingConfig) -> Self {
        Self {
            timing,
            phase: Phase::Waiting,
            phase_started: None,
            samples: Vec::new(),
            observations: Vec::new(),
            profile: None,
            plan: None,
            choice: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// 確定した最頻値（Displaying境界以降のみ）
    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    pub fn choice(&self) -> Option<Choice> {
        self.choice
    }

    /// 現フェーズのタイマー経過秒数
    pub fn elapsed_secs(&self, now: Instant) -> Option<u64> {
        self.phase_started
            .map(|start| now.duration_since(start).as_secs())
    }

    /// Waiting: 顔が見つからなかったtick。タイマーを未設定に戻す。
    pub fn face_lost(&mut self) {
        if self.phase == Phase::Waiting {
            self.phase_started = None;
        }
    }

    /// Waiting: 顔が見つかったtick
    ///
    /// 初回検出でタイマーを開始し、ウィンドウ内は使えるサンプル
    /// だけを蓄積する。ウィンドウ満了後もサンプルが1つもなければ
    /// 遷移せず収集を続ける（空の縮約を防ぐガード）。
    pub fn observe_face(&mut self, sample: Option<Sample>, now: Instant) {
        if self.phase != Phase::Waiting {
            return;
        }
        let start = *self.phase_started.get_or_insert(now);
        let elapsed = now.duration_since(start).as_secs();

        if elapsed < self.timing.face_window_secs {
            if let Some(sample) = sample {
                self.samples.push(sample);
            }
        } else if !self.samples.is_empty() {
            self.phase = Phase::Analyzing;
            self.phase_started = None;
        } else if let Some(sample) = sample {
            self.samples.push(sample);
        }
    }

    /// Analyzing: 体型観測のtick
    ///
    /// 最初のwarmup秒は被写体が下がるのを待つだけで何も集めない。
    /// その後ウィンドウ満了まで観測を蓄積する。満了時に観測が
    /// なければ遷移を保留する。
    pub fn observe_body(&mut self, build: Option<Build>, now: Instant) {
        if self.phase != Phase::Analyzing {
            return;
        }
        let start = *self.phase_started.get_or_insert(now);
        let elapsed = now.duration_since(start).as_secs();

        if elapsed < self.timing.warmup_secs {
            // ウォームアップ中は収集しない
        } else if elapsed < self.timing.body_window_secs {
            if let Some(build) = build {
                self.observations.push(build);
            }
        } else if !self.observations.is_empty() {
            self.phase = Phase::Displaying;
            self.phase_started = None;
        } else if let Some(build) = build {
            self.observations.push(build);
        }
    }

    /// Displaying: 両シーケンスを最頻値に縮約し、プランを計算して
    /// 即座に Choosing へ遷移する。描画のない1tickの計算ステップ。
    ///
    /// 遷移ガードにより両シーケンスは空でないはずだが、万一に
    /// 備えて失敗はエラーとして返す。
    pub fn resolve(&mut self) -> Result<()> {
        if self.phase != Phase::Displaying {
            return Ok(());
        }

        let sample = mode(&self.samples).context("No attribute samples collected")?;
        let build = mode(&self.observations).context("No build observations collected")?;

        let profile = Profile {
            age: sample.age,
            gender: sample.gender,
            height: sample.height,
            build,
        };
        self.plan = Some(recommend(profile.age, profile.gender, profile.build, profile.height));
        self.profile = Some(profile);
        self.phase = Phase::Choosing;
        Ok(())
    }

    /// Choosing: 検出されたジェスチャを受け取る
    ///
    /// 一度確定した選択は以後のジェスチャで変わらない。
    pub fn observe_gesture(&mut self, direction: Option<Direction>) {
        if self.phase != Phase::Choosing || self.choice.is_some() {
            return;
        }
        self.choice = direction.map(|d| match d {
            Direction::Left => Choice::CadenceView,
            Direction::Right => Choice::ExerciseView,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn timing() -> TimingConfig {
        TimingConfig {
            face_window_secs: 5,
            warmup_secs: 3,
            body_window_secs: 8,
        }
    }

    fn sample(age: AgeBracket, gender: Gender, height: f32) -> Sample {
        Sample { age, gender, height }
    }

    #[test]
    fn test_mode_most_frequent_tuple() {
        let samples = [
            sample(AgeBracket::YoungAdult, Gender::Hombre, 170.0),
            sample(AgeBracket::YoungAdult, Gender::Hombre, 170.0),
            sample(AgeBracket::Adult, Gender::Mujer, 160.0),
        ];
        let m = mode(&samples).unwrap();
        assert_eq!(m, sample(AgeBracket::YoungAdult, Gender::Hombre, 170.0));
    }

    #[test]
    fn test_mode_tie_first_encountered_wins() {
        let items = [2, 1, 1, 2];
        assert_eq!(mode(&items), Some(2));
    }

    #[test]
    fn test_mode_empty() {
        assert_eq!(mode::<i32>(&[]), None);
    }

    #[test]
    fn test_full_phase_sequence() {
        let mut session = Session::new(timing());
        let t0 = Instant::now();
        assert_eq!(session.phase(), Phase::Waiting);

        // 顔なし -> Waitingのまま
        session.face_lost();
        assert_eq!(session.phase(), Phase::Waiting);

        // 顔サンプリングウィンドウ
        session.observe_face(Some(sample(AgeBracket::YoungAdult, Gender::Mujer, 1.5)), t0);
        session.observe_face(
            Some(sample(AgeBracket::YoungAdult, Gender::Mujer, 1.5)),
            t0 + Duration::from_secs(2),
        );
        assert_eq!(session.phase(), Phase::Waiting);

        // ウィンドウ満了で Analyzing へ
        session.observe_face(None, t0 + Duration::from_secs(6));
        assert_eq!(session.phase(), Phase::Analyzing);

        // ウォームアップ中は集めない
        let t1 = t0 + Duration::from_secs(6);
        session.observe_body(Some(Build::Mesomorfo), t1);
        session.observe_body(Some(Build::Mesomorfo), t1 + Duration::from_secs(1));
        assert_eq!(session.observations.len(), 0);

        // 収集ウィンドウ
        session.observe_body(Some(Build::Mesomorfo), t1 + Duration::from_secs(4));
        session.observe_body(None, t1 + Duration::from_secs(5));
        session.observe_body(Some(Build::Mesomorfo), t1 + Duration::from_secs(6));
        assert_eq!(session.phase(), Phase::Analyzing);

        // ウィンドウ満了で Displaying へ
        session.observe_body(None, t1 + Duration::from_secs(9));
        assert_eq!(session.phase(), Phase::Displaying);

        // 縮約とプラン計算は1tickで完了
        session.resolve().unwrap();
        assert_eq!(session.phase(), Phase::Choosing);

        let profile = session.profile().unwrap();
        assert_eq!(profile.age, AgeBracket::YoungAdult);
        assert_eq!(profile.gender, Gender::Mujer);
        assert_eq!(profile.build, Build::Mesomorfo);

        let plan = session.plan().unwrap();
        assert_eq!(
            plan.exercises,
            vec!["Running", "Moderate cycling", "Weight lifting", "Yoga"]
        );
        assert_eq!(plan.rpm_target, 70);
    }

    #[test]
    fn test_face_lost_resets_timer() {
        let mut session = Session::new(timing());
        let t0 = Instant::now();

        session.observe_face(Some(sample(AgeBracket::Teen, Gender::Hombre, 1.4)), t0);
        assert!(session.elapsed_secs(t0 + Duration::from_secs(3)).is_some());

        session.face_lost();
        assert_eq!(session.elapsed_secs(t0), None);

        // 再検出でタイマーは最初から
        session.observe_face(
            Some(sample(AgeBracket::Teen, Gender::Hombre, 1.4)),
            t0 + Duration::from_secs(10),
        );
        assert_eq!(session.phase(), Phase::Waiting);
    }

    #[test]
    fn test_empty_window_does_not_transition() {
        let mut session = Session::new(timing());
        let t0 = Instant::now();

        // 顔はあるがサンプルは一度も得られない
        session.observe_face(None, t0);
        session.observe_face(None, t0 + Duration::from_secs(7));
        assert_eq!(session.phase(), Phase::Waiting);

        // 満了後でも最初のサンプルが入るまで待ち、次のtickで遷移
        session.observe_face(
            Some(sample(AgeBracket::Child, Gender::Hombre, 1.0)),
            t0 + Duration::from_secs(8),
        );
        assert_eq!(session.phase(), Phase::Waiting);
        session.observe_face(None, t0 + Duration::from_secs(9));
        assert_eq!(session.phase(), Phase::Analyzing);
    }

    #[test]
    fn test_choice_persists() {
        let mut session = Session::new(timing());
        let t0 = Instant::now();
        session.observe_face(Some(sample(AgeBracket::YoungAdult, Gender::Hombre, 1.7)), t0);
        session.observe_face(None, t0 + Duration::from_secs(6));
        session.observe_body(None, t0 + Duration::from_secs(10));
        session.observe_body(Some(Build::Ectomorfo), t0 + Duration::from_secs(14));
        session.observe_body(None, t0 + Duration::from_secs(19));
        session.resolve().unwrap();
        assert_eq!(session.phase(), Phase::Choosing);

        // 選択前のtickでジェスチャなし
        session.observe_gesture(None);
        assert_eq!(session.choice(), None);

        session.observe_gesture(Some(Direction::Left));
        assert_eq!(session.choice(), Some(Choice::CadenceView));

        // 以後のジェスチャでは再評価されない
        session.observe_gesture(Some(Direction::Right));
        assert_eq!(session.choice(), Some(Choice::CadenceView));
    }

    #[test]
    fn test_observations_ignored_outside_phase() {
        let mut session = Session::new(timing());
        let t0 = Instant::now();

        // Waiting中の体型観測・ジェスチャは無視される
        session.observe_body(Some(Build::Endomorfo), t0);
        session.observe_gesture(Some(Direction::Right));
        assert_eq!(session.observations.len(), 0);
        assert_eq!(session.choice(), None);

        // Displaying以外でのresolveは何もしない
        session.resolve().unwrap();
        assert_eq!(session.phase(), Phase::Waiting);
    }
}
