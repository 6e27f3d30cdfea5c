//! # PID controller
//!
//! Proportional/integral controller with feedforward, output saturation and
//! an integrator freeze input. No derivative gain is used, the derivative
//! term is reported as zero.
//!
//! The controller is discrete: it is updated exactly once per control cycle
//! and the integral accumulates `error * k_i * cycle_period_s` per update.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use util::maths::{clamp, interp};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A controller gain scheduled on speed.
///
/// The gain is linearly interpolated between the breakpoints and held
/// constant outside of them. Torque control uses a single breakpoint, so the
/// gain is the same at every (finite) speed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GainSchedule {
    /// Speed breakpoints, increasing.
    ///
    /// Units: meters/second
    speed_bp_ms: Vec<f64>,

    /// Gain at each breakpoint
    gain: Vec<f64>
}

/// A PID controller with feedforward.
#[derive(Debug, Clone, Serialize)]
pub struct PidController {
    k_p: GainSchedule,
    k_i: GainSchedule,

    /// Feedforward gain
    k_f: f64,

    /// Output upper limit
    pos_limit: f64,

    /// Output lower limit
    neg_limit: f64,

    /// Integration step, the cycle period in seconds.
    i_rate: f64,

    // ---- LAST TERMS ----

    p: f64,
    i: f64,
    d: f64,
    f: f64,
    control: f64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl GainSchedule {
    /// A gain which does not vary with speed.
    pub fn constant(gain: f64) -> Self {
        Self {
            speed_bp_ms: vec![0.0],
            gain: vec![gain]
        }
    }

    /// The gain at the given speed.
    pub fn at(&self, speed_ms: f64) -> f64 {
        interp(speed_ms, &self.speed_bp_ms, &self.gain)
    }
}

impl From<f64> for GainSchedule {
    fn from(gain: f64) -> Self {
        Self::constant(gain)
    }
}

impl PidController {

    /// Create a new controller with the given gains and output limits.
    pub fn new<P, I>(
        k_p: P,
        k_i: I,
        k_f: f64,
        pos_limit: f64,
        neg_limit: f64,
        cycle_period_s: f64
    ) -> Self
    where
        P: Into<GainSchedule>,
        I: Into<GainSchedule>
    {
        Self {
            k_p: k_p.into(),
            k_i: k_i.into(),
            k_f,
            pos_limit,
            neg_limit,
            i_rate: cycle_period_s,
            p: 0.0,
            i: 0.0,
            d: 0.0,
            f: 0.0,
            control: 0.0
        }
    }

    /// Clear the integral and the last computed terms.
    ///
    /// Gains and limits are kept.
    pub fn reset(&mut self) {
        self.p = 0.0;
        self.i = 0.0;
        self.d = 0.0;
        self.f = 0.0;
        self.control = 0.0;
    }

    /// Update the controller and return the saturated control.
    ///
    /// If `freeze_integrator` is set the integral holds its last value.
    /// Otherwise the integral is clamped so the sum of all terms stays inside
    /// the output limits. The clamp only ever stops the integral growing out
    /// of the limits, it does not pull an existing integral back.
    ///
    /// Non-finite inputs give a non-finite output.
    pub fn update(
        &mut self,
        error: f64,
        feedforward: f64,
        speed_ms: f64,
        freeze_integrator: bool
    ) -> f64 {
        self.p = error * self.k_p.at(speed_ms);
        self.f = feedforward * self.k_f;

        if !freeze_integrator {
            let i = self.i + error * self.k_i.at(speed_ms) * self.i_rate;

            let others = self.p + self.d + self.f;
            let upper = (self.pos_limit - others).max(self.i);
            let lower = (self.neg_limit - others).min(self.i);

            self.i = clamp(&i, &lower, &upper);
        }

        let control = self.p + self.i + self.d + self.f;
        self.control = clamp(&control, &self.neg_limit, &self.pos_limit);

        self.control
    }

    /// Last proportional term
    pub fn p(&self) -> f64 {
        self.p
    }

    /// Integral accumulator
    pub fn i(&self) -> f64 {
        self.i
    }

    /// Last derivative term, always zero
    pub fn d(&self) -> f64 {
        self.d
    }

    /// Last feedforward term
    pub fn f(&self) -> f64 {
        self.f
    }

    /// Last saturated control
    pub fn control(&self) -> f64 {
        self.control
    }

    pub fn k_f(&self) -> f64 {
        self.k_f
    }

    /// The proportional and integral gains at the given speed.
    pub fn gains_at(&self, speed_ms: f64) -> (f64, f64) {
        (self.k_p.at(speed_ms), self.k_i.at(speed_ms))
    }

    /// The output limits as `(neg_limit, pos_limit)`.
    pub fn limits(&self) -> (f64, f64) {
        (self.neg_limit, self.pos_limit)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    const DT: f64 = 0.01;

    fn pid(k_p: f64, k_i: f64, k_f: f64) -> PidController {
        PidController::new(k_p, k_i, k_f, 1.0, -1.0, DT)
    }

    #[test]
    fn test_proportional_and_feedforward() {
        let mut ctrl = pid(2.0, 0.0, 0.5);

        let out = ctrl.update(0.1, 0.4, 10.0, false);
        assert!((ctrl.p() - 0.2).abs() < 1e-12);
        assert!((ctrl.f() - 0.2).abs() < 1e-12);
        assert_eq!(ctrl.d(), 0.0);
        assert!((out - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_integral_accumulates() {
        let mut ctrl = pid(0.0, 1.0, 0.0);

        for _ in 0..10 {
            ctrl.update(0.5, 0.0, 10.0, false);
        }

        // 10 cycles of 0.5 * 1.0 * 0.01
        assert!((ctrl.i() - 0.05).abs() < 1e-12);
        assert!((ctrl.control() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_output_saturates() {
        let mut ctrl = pid(10.0, 0.0, 1.0);

        assert_eq!(ctrl.update(1.0, 0.0, 10.0, false), 1.0);
        assert_eq!(ctrl.update(-1.0, -3.0, 10.0, false), -1.0);
    }

    #[test]
    fn test_freeze_holds_integral() {
        let mut ctrl = pid(0.5, 2.0, 0.0);

        for _ in 0..20 {
            ctrl.update(0.3, 0.0, 10.0, false);
        }
        let i_before = ctrl.i();
        assert!(i_before > 0.0);

        // Wildly varying errors with the integrator frozen
        for k in 0..50 {
            let error = if k % 2 == 0 { 5.0 } else { -7.5 };
            ctrl.update(error, 0.1 * k as f64, 10.0, true);
        }

        assert_eq!(ctrl.i(), i_before);
    }

    #[test]
    fn test_integral_anti_windup() {
        let mut ctrl = pid(0.5, 10.0, 0.0);

        // Drive into saturation for a long time
        for _ in 0..1000 {
            ctrl.update(1.0, 0.0, 10.0, false);
        }

        // The integral can only take up the remaining headroom
        assert!((ctrl.i() - 0.5).abs() < 1e-9);
        assert!(ctrl.p() + ctrl.i() <= 1.0 + 1e-12);

        // So reversing the error comes out of saturation immediately
        let out = ctrl.update(-0.5, 0.0, 10.0, false);
        assert!(out < 1.0);
    }

    #[test]
    fn test_anti_windup_does_not_pull_integral() {
        let mut ctrl = pid(0.0, 1.0, 1.0);

        for _ in 0..100 {
            ctrl.update(0.5, 0.0, 10.0, false);
        }
        let i_before = ctrl.i();

        // A large feedforward leaves no headroom, the integral must not grow
        // further but must not be dragged negative either.
        ctrl.update(0.5, 3.0, 10.0, false);
        assert_eq!(ctrl.i(), i_before);
        assert_eq!(ctrl.control(), 1.0);

        // Negative error may still reduce it
        ctrl.update(-0.5, 3.0, 10.0, false);
        assert!(ctrl.i() < i_before);
    }

    #[test]
    fn test_reset() {
        let mut ctrl = pid(1.0, 1.0, 1.0);

        for _ in 0..10 {
            ctrl.update(0.2, 0.1, 10.0, false);
        }
        ctrl.reset();

        assert_eq!(ctrl.p(), 0.0);
        assert_eq!(ctrl.i(), 0.0);
        assert_eq!(ctrl.d(), 0.0);
        assert_eq!(ctrl.f(), 0.0);
        assert_eq!(ctrl.control(), 0.0);

        // Gains and limits survive
        assert_eq!(ctrl.gains_at(10.0), (1.0, 1.0));
        assert_eq!(ctrl.k_f(), 1.0);
        assert_eq!(ctrl.limits(), (-1.0, 1.0));
    }

    #[test]
    fn test_constant_gain_schedule() {
        let k = GainSchedule::constant(0.8);

        assert_eq!(k.at(0.0), 0.8);
        assert_eq!(k.at(35.0), 0.8);
        assert_eq!(k.at(-1.0), 0.8);
        assert_eq!(GainSchedule::from(0.4), GainSchedule::constant(0.4));
    }

    #[test]
    fn test_non_finite_propagates() {
        let mut ctrl = pid(1.0, 1.0, 1.0);

        assert!(ctrl.update(std::f64::NAN, 0.0, 10.0, false).is_nan());
    }

    #[test]
    fn test_nan_speed_propagates() {
        let mut ctrl = PidController::new(0.8, 0.4, 0.2, 1.0, -1.0, DT);

        assert!(ctrl.update(0.1, 0.0, std::f64::NAN, false).is_nan());
        assert!(ctrl.p().is_nan());

        // Frozen, the integral survives
        let mut ctrl = PidController::new(0.8, 0.4, 0.2, 1.0, -1.0, DT);
        assert!(ctrl.update(0.1, 0.0, std::f64::NAN, true).is_nan());
        assert_eq!(ctrl.i(), 0.0);
    }
}
