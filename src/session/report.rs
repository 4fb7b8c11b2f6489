use super::{Session, Statistics};
use std::fmt;

/// Human-readable report of a recorded session.
///
/// Angles are printed with one decimal, distances with two.
pub fn generate_report(session: &Session, statistics: &Statistics) -> String {
    SessionReport { session, statistics }.to_string()
}

struct SessionReport<'a> {
    session: &'a Session,
    statistics: &'a Statistics,
}

impl fmt::Display for SessionReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.session;
        let stats = self.statistics;
        let means = &stats.means;

        writeln!(f, "Nordic walking technique report")?;
        writeln!(f, "Session: {}", session.id())?;
        if let Some(student_id) = session.student_id() {
            writeln!(f, "Student: {}", student_id)?;
        }
        writeln!(f, "View: {} ({})", session.direction(), session.source())?;
        writeln!(f, "Duration: {:.1} s", stats.duration_secs)?;
        writeln!(f, "Frames: {}", stats.total_frames)?;
        writeln!(f, "Mean confidence: {:.2}", stats.mean_confidence)?;
        writeln!(f)?;

        writeln!(f, "Mean metrics:")?;
        writeln!(f, "  Trunk tilt: {:.1}°", means.trunk_tilt)?;
        writeln!(
            f,
            "  Elbow angle: {:.1}° left, {:.1}° right",
            means.left_elbow_angle, means.right_elbow_angle
        )?;
        writeln!(
            f,
            "  Knee angle: {:.1}° left, {:.1}° right",
            means.left_knee_angle, means.right_knee_angle
        )?;
        writeln!(
            f,
            "  Hip angle: {:.1}° left, {:.1}° right",
            means.left_hip_angle, means.right_hip_angle
        )?;
        writeln!(
            f,
            "  Arm swing: {:.1}°/{:.1}° left, {:.1}°/{:.1}° right (forward/backward)",
            means.left_arm_swing_forward,
            means.left_arm_swing_backward,
            means.right_arm_swing_forward,
            means.right_arm_swing_backward
        )?;
        writeln!(
            f,
            "  Pole angle: {:.1}° left, {:.1}° right",
            means.left_pole_angle, means.right_pole_angle
        )?;
        writeln!(f, "  Step length: {:.2}", means.step_length)?;
        writeln!(f, "  Step width: {:.2}", means.step_width)?;
        writeln!(f, "  Center of mass height: {:.2}", means.com_height)?;
        writeln!(f, "  Center of mass displacement: {:.2}", means.com_displacement)?;
        writeln!(f)?;

        writeln!(
            f,
            "Violations: {} ({} critical)",
            stats.total_violations, stats.critical_violations
        )?;
        if session.violations().is_empty() {
            writeln!(f, "  none")?;
        }
        for violation in session.violations() {
            writeln!(
                f,
                "  - [{}] frame {}: {}",
                violation.severity, violation.frame_index, violation.description
            )?;
            writeln!(f, "    Suggestion: {}", violation.suggestion)?;
        }
        Ok(())
    }
}
