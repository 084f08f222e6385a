//! 2-opt improvement for open paths with a fixed first stop.

const EPSILON: f64 = 1e-9;

/// Reverses segments of `order` while that shortens the path.
///
/// `order[0]` never moves. `dist(a, b)` is the leg length between the
/// items at positions `a` and `b` of the original task list. Returns the
/// number of improving moves applied.
pub(crate) fn improve<F>(order: &mut [usize], dist: F) -> usize
where
    F: Fn(usize, usize) -> f64,
{
    let n = order.len();
    if n < 3 {
        return 0;
    }

    let mut moves = 0;
    let mut improved = true;
    while improved {
        improved = false;
        for i in 1..n - 1 {
            for k in (i + 1)..n {
                let before = dist(order[i - 1], order[i])
                    + if k + 1 < n { dist(order[k], order[k + 1]) } else { 0.0 };
                let after = dist(order[i - 1], order[k])
                    + if k + 1 < n { dist(order[i], order[k + 1]) } else { 0.0 };
                if after + EPSILON < before {
                    order[i..=k].reverse();
                    moves += 1;
                    improved = true;
                }
            }
        }
    }
    moves
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_length(order: &[usize], points: &[(f64, f64)]) -> f64 {
        order
            .windows(2)
            .map(|w| {
                let (a, b) = (points[w[0]], points[w[1]]);
                ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
            })
            .sum()
    }

    #[test]
    fn test_uncrosses_path() {
        // Points on a line visited out of order: 0, 2, 1, 3
        let points: [(f64, f64); 4] = [(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)];
        let dist = |a: usize, b: usize| {
            let (p, q) = (points[a], points[b]);
            ((p.0 - q.0).powi(2) + (p.1 - q.1).powi(2)).sqrt()
        };
        let mut order = vec![0, 2, 1, 3];
        let before = path_length(&order, &points);

        let moves = improve(&mut order, dist);
        assert!(moves > 0);
        assert_eq!(order, vec![0, 1, 2, 3]);
        assert!(path_length(&order, &points) < before);
    }

    #[test]
    fn test_start_fixed_and_small_inputs() {
        let dist = |a: usize, b: usize| (a as f64 - b as f64).abs();
        let mut order = vec![3, 0, 1, 2];
        improve(&mut order, dist);
        assert_eq!(order[0], 3);

        let mut two = vec![1, 0];
        assert_eq!(improve(&mut two, dist), 0);
        assert_eq!(two, vec![1, 0]);
    }
}
