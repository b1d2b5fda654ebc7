use super::defs::Continous;

/// `exp(x_i - max) / sum_j exp(x_j - max)`
pub fn softmax(args: &[Continous]) -> Vec<Continous> {
    let max = args.iter().copied().fold(Continous::NEG_INFINITY, Continous::max);
    let exps = args.iter().map(|x| (x - max).exp()).collect::<Vec<_>>();
    let sum = exps.iter().sum::<Continous>();

    exps.into_iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::*;

    #[test]
    fn softmax_of_equal_values_is_uniform() {
        assert_float_eq!(softmax(&[3., 3., 3., 3.]), vec![0.25; 4], abs_all <= 1e-12);
    }

    #[test]
    fn softmax_matches_definition() {
        let args = [0., 1., 2., -1.];
        let sum = args.iter().map(|x: &f64| x.exp()).sum::<f64>();
        let expected = args.iter().map(|x| x.exp() / sum).collect::<Vec<_>>();

        assert_float_eq!(softmax(&args), expected, abs_all <= 1e-12);
    }

    #[test]
    fn softmax_survives_large_magnitudes() {
        let p = softmax(&[-1000., -1000., 1000., 1000.]);

        assert_float_eq!(p, vec![0., 0., 0.5, 0.5], abs_all <= 1e-12);
    }
}
