//! User profile types for sleep disorder prediction.
//!
//! Categorical fields are closed enums. Their integer codes are the label
//! encodings the classifier was trained with and must never be re-derived
//! (e.g. by sorting the names).

use serde::{Deserialize, Serialize};

/// Number of features the classifier consumes.
pub const FEATURE_COUNT: usize = 12;

/// Feature names in the exact order the classifier expects.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "gender",
    "age",
    "occupation",
    "sleep_duration",
    "quality_of_sleep",
    "physical_activity",
    "stress_level",
    "bmi_category",
    "heart_rate",
    "daily_steps",
    "upper_bp",
    "lower_bp",
];

/// Biological sex as recorded in the training data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    /// Label-encoded value.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Male => 1,
            Self::Female => 0,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

/// Occupation categories known to the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupation {
    SoftwareEngineer,
    Doctor,
    Nurse,
    Teacher,
    Salesperson,
    Lawyer,
    Engineer,
    Student,
    Scientist,
    Driver,
    Other,
}

impl Occupation {
    /// Display order used by the form.
    pub const ALL: [Occupation; 11] = [
        Occupation::SoftwareEngineer,
        Occupation::Doctor,
        Occupation::Nurse,
        Occupation::Teacher,
        Occupation::Salesperson,
        Occupation::Lawyer,
        Occupation::Engineer,
        Occupation::Student,
        Occupation::Scientist,
        Occupation::Driver,
        Occupation::Other,
    ];

    /// Label-encoded value.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Engineer => 0,
            Self::Doctor => 1,
            Self::Lawyer => 2,
            Self::Scientist => 3,
            Self::Other => 4,
            Self::Salesperson => 5,
            Self::Nurse => 6,
            Self::Driver => 7,
            Self::Student => 8,
            Self::SoftwareEngineer => 9,
            Self::Teacher => 10,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::SoftwareEngineer => "Software Engineer",
            Self::Doctor => "Doctor",
            Self::Nurse => "Nurse",
            Self::Teacher => "Teacher",
            Self::Salesperson => "Salesperson",
            Self::Lawyer => "Lawyer",
            Self::Engineer => "Engineer",
            Self::Student => "Student",
            Self::Scientist => "Scientist",
            Self::Driver => "Driver",
            Self::Other => "Other",
        }
    }
}

/// BMI category as recorded in the training data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BmiCategory {
    Normal,
    Obese,
    Overweight,
    Underweight,
}

impl BmiCategory {
    pub const ALL: [BmiCategory; 4] = [
        BmiCategory::Normal,
        BmiCategory::Obese,
        BmiCategory::Overweight,
        BmiCategory::Underweight,
    ];

    /// Label-encoded value.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::Obese => 1,
            Self::Overweight => 2,
            Self::Underweight => 3,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Obese => "Obese",
            Self::Overweight => "Overweight",
            Self::Underweight => "Underweight",
        }
    }
}

macro_rules! impl_display_label {
    ($($ty:ty),*) => {
        $(impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        })*
    };
}

impl_display_label!(Gender, Occupation, BmiCategory);

/// Inclusive bounds, step and default for a numeric profile field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

impl FieldBounds {
    const fn new(min: f64, max: f64, step: f64, default: f64) -> Self {
        Self {
            min,
            max,
            step,
            default,
        }
    }

    /// Clamp a value into the bounds.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

pub const AGE: FieldBounds = FieldBounds::new(10.0, 100.0, 1.0, 25.0);
pub const SLEEP_DURATION: FieldBounds = FieldBounds::new(0.0, 12.0, 0.5, 7.0);
pub const QUALITY_OF_SLEEP: FieldBounds = FieldBounds::new(1.0, 10.0, 1.0, 6.0);
pub const PHYSICAL_ACTIVITY: FieldBounds = FieldBounds::new(0.0, 180.0, 1.0, 30.0);
pub const DAILY_STEPS: FieldBounds = FieldBounds::new(0.0, 30000.0, 500.0, 5000.0);
pub const STRESS_LEVEL: FieldBounds = FieldBounds::new(1.0, 10.0, 1.0, 5.0);
pub const HEART_RATE: FieldBounds = FieldBounds::new(40.0, 180.0, 1.0, 70.0);
pub const UPPER_BP: FieldBounds = FieldBounds::new(90.0, 180.0, 1.0, 120.0);
pub const LOWER_BP: FieldBounds = FieldBounds::new(60.0, 120.0, 1.0, 80.0);

/// Raw field values collected from the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub gender: Gender,
    /// Years (10-100)
    pub age: u32,
    pub occupation: Occupation,
    /// Hours per night (0.0-12.0, step 0.5)
    pub sleep_duration: f64,
    /// Self-rated 1-10
    pub quality_of_sleep: u32,
    /// Minutes per day (0-180)
    pub physical_activity: u32,
    /// Steps per day (0-30000, step 500)
    pub daily_steps: u32,
    /// Self-rated 1-10
    pub stress_level: u32,
    pub bmi_category: BmiCategory,
    /// Resting heart rate in bpm (40-180)
    pub heart_rate: u32,
    /// Systolic blood pressure in mmHg (90-180)
    pub upper_bp: u32,
    /// Diastolic blood pressure in mmHg (60-120)
    pub lower_bp: u32,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            gender: Gender::Male,
            age: AGE.default as u32,
            occupation: Occupation::SoftwareEngineer,
            sleep_duration: SLEEP_DURATION.default,
            quality_of_sleep: QUALITY_OF_SLEEP.default as u32,
            physical_activity: PHYSICAL_ACTIVITY.default as u32,
            daily_steps: DAILY_STEPS.default as u32,
            stress_level: STRESS_LEVEL.default as u32,
            bmi_category: BmiCategory::Normal,
            heart_rate: HEART_RATE.default as u32,
            upper_bp: UPPER_BP.default as u32,
            lower_bp: LOWER_BP.default as u32,
        }
    }
}

impl UserProfile {
    /// Encode the profile into the classifier's feature vector.
    ///
    /// Order: gender, age, occupation, sleep_duration, quality_of_sleep,
    /// physical_activity, stress_level, bmi_category, heart_rate, daily_steps,
    /// upper_bp, lower_bp.
    #[must_use]
    pub fn encode(&self) -> FeatureVector {
        FeatureVector([
            f64::from(self.gender.code()),
            f64::from(self.age),
            f64::from(self.occupation.code()),
            self.sleep_duration,
            f64::from(self.quality_of_sleep),
            f64::from(self.physical_activity),
            f64::from(self.stress_level),
            f64::from(self.bmi_category.code()),
            f64::from(self.heart_rate),
            f64::from(self.daily_steps),
            f64::from(self.upper_bp),
            f64::from(self.lower_bp),
        ])
    }

    /// Check every numeric field against its bounds.
    ///
    /// The form clamps its controls, so this only matters for profiles
    /// assembled elsewhere.
    ///
    /// # Errors
    /// Returns one message per out-of-range field.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let checks = [
            ("Age", AGE, f64::from(self.age)),
            ("Sleep duration", SLEEP_DURATION, self.sleep_duration),
            ("Quality of sleep", QUALITY_OF_SLEEP, f64::from(self.quality_of_sleep)),
            ("Physical activity", PHYSICAL_ACTIVITY, f64::from(self.physical_activity)),
            ("Daily steps", DAILY_STEPS, f64::from(self.daily_steps)),
            ("Stress level", STRESS_LEVEL, f64::from(self.stress_level)),
            ("Heart rate", HEART_RATE, f64::from(self.heart_rate)),
            ("Upper BP", UPPER_BP, f64::from(self.upper_bp)),
            ("Lower BP", LOWER_BP, f64::from(self.lower_bp)),
        ];

        let errors: Vec<String> = checks
            .iter()
            .filter(|(_, bounds, value)| !bounds.contains(*value))
            .map(|(label, bounds, value)| {
                format!(
                    "{label} {value} out of range [{}, {}]",
                    bounds.min, bounds.max
                )
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Fixed-order numeric input row for the classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        self.0.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_codes() {
        assert_eq!(Gender::Male.code(), 1);
        assert_eq!(Gender::Female.code(), 0);
    }

    #[test]
    fn test_bmi_codes() {
        let codes: Vec<u8> = BmiCategory::ALL.iter().map(|b| b.code()).collect();
        assert_eq!(codes, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_occupation_codes_are_training_encodings() {
        let expected = [
            ("Software Engineer", 9),
            ("Doctor", 1),
            ("Nurse", 6),
            ("Teacher", 10),
            ("Salesperson", 5),
            ("Lawyer", 2),
            ("Engineer", 0),
            ("Student", 8),
            ("Scientist", 3),
            ("Driver", 7),
            ("Other", 4),
        ];
        assert_eq!(Occupation::ALL.len(), expected.len());
        for (occupation, (label, code)) in Occupation::ALL.iter().zip(expected) {
            assert_eq!(occupation.label(), label);
            assert_eq!(occupation.code(), code, "code for {label}");
        }
    }

    #[test]
    fn test_occupation_codes_are_distinct() {
        let mut codes: Vec<u8> = Occupation::ALL.iter().map(|o| o.code()).collect();
        codes.sort_unstable();
        assert_eq!(codes, (0..=10).collect::<Vec<u8>>());
    }

    #[test]
    fn test_encode_reference_profile() {
        let profile = UserProfile::default();
        let v = profile.encode();
        assert_eq!(
            v.to_vec(),
            vec![1.0, 25.0, 9.0, 7.0, 6.0, 30.0, 5.0, 0.0, 70.0, 5000.0, 120.0, 80.0]
        );
    }

    #[test]
    fn test_encode_preserves_field_order() {
        let profile = UserProfile {
            gender: Gender::Female,
            age: 61,
            occupation: Occupation::Teacher,
            sleep_duration: 5.5,
            quality_of_sleep: 3,
            physical_activity: 90,
            daily_steps: 12000,
            stress_level: 8,
            bmi_category: BmiCategory::Underweight,
            heart_rate: 88,
            upper_bp: 140,
            lower_bp: 95,
        };
        let v = profile.encode();
        assert_eq!(v.as_slice().len(), FEATURE_COUNT);
        assert_eq!(
            v.to_vec(),
            vec![0.0, 61.0, 10.0, 5.5, 3.0, 90.0, 8.0, 3.0, 88.0, 12000.0, 140.0, 95.0]
        );
    }

    #[test]
    fn test_age_bounds_accepted() {
        for age in [10, 100] {
            let profile = UserProfile {
                age,
                ..UserProfile::default()
            };
            assert!(profile.validate().is_ok());
            assert!((profile.encode().0[1] - f64::from(age)).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_validation_reports_each_violation() {
        let profile = UserProfile {
            age: 9,
            heart_rate: 200,
            sleep_duration: 12.5,
            ..UserProfile::default()
        };
        let errors = profile.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].starts_with("Age"));
    }
}
