use rand::Rng;

use crate::entities::wheel_prize_entity as prizes;

/// 随机抽取 roll 值, 取值范围 [0, 100)。
/// 随机源为进程内的 thread_rng, 绝不接受客户端提供的种子。
pub fn draw_roll() -> f64 {
    rand::thread_rng().gen_range(0.0..100.0)
}

/// 按累计概率分桶选择奖品。
///
/// 奖品顺序必须稳定 (按 id 升序 = 配置声明顺序), 因为边界值上的归属
/// 取决于遍历顺序; 判定条件为 roll <= 累计值。
/// 校验通过的配置下累计值最终为 100, roll 必然落入某个桶;
/// 若浮点误差导致 roll 超出总和, 兜底返回最后一个启用奖品 (既定策略, 非错误)。
pub fn select_prize(list: &[prizes::Model], roll: f64) -> Option<&prizes::Model> {
    let mut cumulative = 0.0;
    let mut last_active = None;

    for prize in list.iter().filter(|p| p.is_active) {
        cumulative += prize.probability;
        last_active = Some(prize);
        if roll <= cumulative {
            return Some(prize);
        }
    }

    last_active
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::PrizeKind;

    fn prize(id: i64, name: &str, probability: f64, is_active: bool) -> prizes::Model {
        prizes::Model {
            id,
            wheel_id: 1,
            name: name.to_string(),
            kind: PrizeKind::Gems,
            value: 10,
            probability,
            is_active,
            created_at: None,
            updated_at: None,
        }
    }

    fn sample_table() -> Vec<prizes::Model> {
        vec![
            prize(1, "gems", 70.0, true),
            prize(2, "tokens", 25.0, true),
            prize(3, "cash", 5.0, true),
        ]
    }

    #[test]
    fn roll_falls_into_first_bucket() {
        let table = sample_table();
        assert_eq!(select_prize(&table, 0.0).unwrap().name, "gems");
        assert_eq!(select_prize(&table, 50.0).unwrap().name, "gems");
    }

    #[test]
    fn boundary_roll_belongs_to_earlier_bucket() {
        // roll <= 累计值: 70 仍属于第一个奖品, 95 属于第二个
        let table = sample_table();
        assert_eq!(select_prize(&table, 70.0).unwrap().name, "gems");
        assert_eq!(select_prize(&table, 70.001).unwrap().name, "tokens");
        assert_eq!(select_prize(&table, 95.0).unwrap().name, "tokens");
        assert_eq!(select_prize(&table, 99.9).unwrap().name, "cash");
    }

    #[test]
    fn inactive_prizes_are_skipped() {
        let table = vec![
            prize(1, "dormant", 70.0, false),
            prize(2, "tokens", 95.0, true),
            prize(3, "cash", 5.0, true),
        ];
        assert_eq!(select_prize(&table, 10.0).unwrap().name, "tokens");
    }

    #[test]
    fn overflow_roll_falls_back_to_last_active() {
        // 概率和略低于 100 时, 超出总和的 roll 落到最后一个启用奖品
        let table = vec![prize(1, "a", 60.0, true), prize(2, "b", 39.995, true)];
        assert_eq!(select_prize(&table, 99.999).unwrap().name, "b");
    }

    #[test]
    fn empty_or_all_inactive_returns_none() {
        assert!(select_prize(&[], 50.0).is_none());
        let table = vec![prize(1, "a", 100.0, false)];
        assert!(select_prize(&table, 50.0).is_none());
    }

    #[test]
    fn draw_roll_stays_in_range() {
        for _ in 0..1000 {
            let roll = draw_roll();
            assert!((0.0..100.0).contains(&roll));
        }
    }

    /// 长期频率收敛到配置概率 (100_000 次, 容差 1 个百分点, 约 7 倍标准差)
    #[test]
    fn selection_frequency_converges_to_probabilities() {
        let table = sample_table();
        let draws = 100_000u32;
        let mut counts = [0u32; 3];

        for _ in 0..draws {
            let won = select_prize(&table, draw_roll()).unwrap();
            counts[(won.id - 1) as usize] += 1;
        }

        let expected = [70.0, 25.0, 5.0];
        for (count, expected_pct) in counts.iter().zip(expected) {
            let actual_pct = f64::from(*count) * 100.0 / f64::from(draws);
            assert!(
                (actual_pct - expected_pct).abs() < 1.0,
                "expected ~{expected_pct}%, got {actual_pct}%"
            );
        }
    }
}
