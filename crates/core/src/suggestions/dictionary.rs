//! Static clinical dictionaries backing the local suggestion engine.
//!
//! Condition names are Dari with an English equivalent; keywords cover both languages.
//! Medicine names stay in their international (English) form as they are written on
//! prescriptions in Afghan clinics; dosing instructions are Dari.

use api_shared::dto::MedicineSuggestion;

#[derive(Debug)]
pub struct MedicineTemplate {
    pub name: &'static str,
    pub dosage: &'static str,
    pub frequency: &'static str,
    pub route: &'static str,
    pub duration: Option<&'static str>,
    pub instructions: Option<&'static str>,
}

impl MedicineTemplate {
    pub fn to_suggestion(&self) -> MedicineSuggestion {
        MedicineSuggestion {
            name: self.name.to_string(),
            dosage: self.dosage.to_string(),
            frequency: self.frequency.to_string(),
            route: self.route.to_string(),
            duration: self.duration.map(str::to_string),
            instructions: self.instructions.map(str::to_string),
        }
    }
}

#[derive(Debug)]
pub struct Condition {
    pub name: &'static str,
    pub name_en: &'static str,
    pub icd_code: &'static str,
    pub keywords: &'static [&'static str],
    pub medicines: &'static [MedicineTemplate],
    pub advice: &'static [&'static str],
}

const PARACETAMOL: MedicineTemplate = MedicineTemplate {
    name: "Paracetamol",
    dosage: "500mg",
    frequency: "هر ۶ ساعت در صورت ضرورت",
    route: "خوراکی",
    duration: Some("۳ تا ۵ روز"),
    instructions: Some("بیشتر از ۴ گرام در روز مصرف نشود"),
};

const IBUPROFEN: MedicineTemplate = MedicineTemplate {
    name: "Ibuprofen",
    dosage: "400mg",
    frequency: "هر ۸ ساعت",
    route: "خوراکی",
    duration: Some("۳ روز"),
    instructions: Some("بعد از غذا مصرف شود"),
};

const CETIRIZINE: MedicineTemplate = MedicineTemplate {
    name: "Cetirizine",
    dosage: "10mg",
    frequency: "روزانه یک بار",
    route: "خوراکی",
    duration: Some("۵ روز"),
    instructions: Some("شب قبل از خواب"),
};

const AMOXICILLIN: MedicineTemplate = MedicineTemplate {
    name: "Amoxicillin",
    dosage: "500mg",
    frequency: "هر ۸ ساعت",
    route: "خوراکی",
    duration: Some("۷ روز"),
    instructions: Some("دوره تداوی تکمیل شود"),
};

const SALBUTAMOL_INHALER: MedicineTemplate = MedicineTemplate {
    name: "Salbutamol Inhaler",
    dosage: "100mcg (۲ پف)",
    frequency: "در صورت ضرورت",
    route: "استنشاقی",
    duration: None,
    instructions: Some("هنگام تنگی نفس"),
};

const METOCLOPRAMIDE: MedicineTemplate = MedicineTemplate {
    name: "Metoclopramide",
    dosage: "10mg",
    frequency: "هر ۸ ساعت",
    route: "خوراکی",
    duration: Some("۳ روز"),
    instructions: Some("نیم ساعت قبل از غذا"),
};

pub static CONDITIONS: &[Condition] = &[
    Condition {
        name: "سرماخوردگی",
        name_en: "Common cold",
        icd_code: "J00",
        keywords: &[
            "سرماخوردگی",
            "زکام",
            "آبریزش بینی",
            "بینی گرفتگی",
            "عطسه",
            "common cold",
            "cold",
            "runny nose",
            "nasal congestion",
            "sneezing",
        ],
        medicines: &[PARACETAMOL, CETIRIZINE],
        advice: &["استراحت کافی و نوشیدن مایعات فراوان"],
    },
    Condition {
        name: "آنفلوانزا",
        name_en: "Influenza",
        icd_code: "J11",
        keywords: &[
            "تب",
            "لرز",
            "بدن درد",
            "درد عضلات",
            "خستگی",
            "آنفلوانزا",
            "fever",
            "chills",
            "body ache",
            "myalgia",
            "flu",
            "influenza",
        ],
        medicines: &[PARACETAMOL, IBUPROFEN],
        advice: &["استراحت در خانه و جلوگیری از تماس نزدیک با دیگران"],
    },
    Condition {
        name: "التهاب گلو (فارنژیت)",
        name_en: "Pharyngitis",
        icd_code: "J02",
        keywords: &[
            "گلودرد",
            "درد گلو",
            "بلع دردناک",
            "التهاب گلو",
            "sore throat",
            "pharyngitis",
            "painful swallowing",
        ],
        medicines: &[AMOXICILLIN, PARACETAMOL],
        advice: &["غرغره با آب نمک گرم روزانه چند بار"],
    },
    Condition {
        name: "برونشیت حاد",
        name_en: "Acute bronchitis",
        icd_code: "J20",
        keywords: &[
            "سرفه",
            "خلط",
            "درد سینه",
            "برونشیت",
            "cough",
            "sputum",
            "chest pain",
            "bronchitis",
        ],
        medicines: &[
            MedicineTemplate {
                name: "Dextromethorphan Syrup",
                dosage: "10ml",
                frequency: "هر ۸ ساعت",
                route: "خوراکی",
                duration: Some("۵ روز"),
                instructions: None,
            },
            SALBUTAMOL_INHALER,
        ],
        advice: &["از دود سگرت و هوای آلوده دوری شود"],
    },
    Condition {
        name: "آسم",
        name_en: "Asthma",
        icd_code: "J45",
        keywords: &[
            "تنگی نفس",
            "نفس تنگی",
            "خس خس سینه",
            "آسم",
            "shortness of breath",
            "wheezing",
            "asthma",
        ],
        medicines: &[
            SALBUTAMOL_INHALER,
            MedicineTemplate {
                name: "Beclomethasone Inhaler",
                dosage: "100mcg",
                frequency: "روزانه دو بار",
                route: "استنشاقی",
                duration: None,
                instructions: Some("بعد از استفاده دهان شسته شود"),
            },
        ],
        advice: &["در صورت تنگی نفس شدید فوراً به عاجل مراجعه شود"],
    },
    Condition {
        name: "حساسیت بینی",
        name_en: "Allergic rhinitis",
        icd_code: "J30",
        keywords: &[
            "حساسیت",
            "خارش چشم",
            "خارش بینی",
            "عطسه",
            "allergy",
            "allergic",
            "itchy eyes",
        ],
        medicines: &[
            MedicineTemplate {
                name: "Loratadine",
                dosage: "10mg",
                frequency: "روزانه یک بار",
                route: "خوراکی",
                duration: Some("۱۰ روز"),
                instructions: None,
            },
            MedicineTemplate {
                name: "Fluticasone Nasal Spray",
                dosage: "50mcg",
                frequency: "روزانه یک بار",
                route: "بینی",
                duration: Some("۱۴ روز"),
                instructions: Some("در هر سوراخ بینی دو پف"),
            },
        ],
        advice: &["از عوامل حساسیت‌زا مانند گرد و غبار دوری شود"],
    },
    Condition {
        name: "سردرد تنشی",
        name_en: "Tension headache",
        icd_code: "G44.2",
        keywords: &["سردرد", "درد سر", "headache"],
        medicines: &[IBUPROFEN, PARACETAMOL],
        advice: &["خواب منظم و کاهش فشار روانی"],
    },
    Condition {
        name: "میگرن",
        name_en: "Migraine",
        icd_code: "G43",
        keywords: &[
            "میگرن",
            "سردرد یک طرفه",
            "حساسیت به نور",
            "migraine",
            "photophobia",
        ],
        medicines: &[
            MedicineTemplate {
                name: "Sumatriptan",
                dosage: "50mg",
                frequency: "در شروع حمله",
                route: "خوراکی",
                duration: None,
                instructions: Some("بیشتر از ۲ قرص در ۲۴ ساعت مصرف نشود"),
            },
            METOCLOPRAMIDE,
        ],
        advice: &["استراحت در اتاق تاریک و آرام"],
    },
    Condition {
        name: "گاستروانتریت",
        name_en: "Gastroenteritis",
        icd_code: "A09",
        keywords: &[
            "اسهال",
            "استفراغ",
            "دلبدی",
            "تهوع",
            "دل پیچه",
            "diarrhea",
            "diarrhoea",
            "vomiting",
            "nausea",
        ],
        medicines: &[
            MedicineTemplate {
                name: "ORS",
                dosage: "1 sachet",
                frequency: "بعد از هر بار اسهال",
                route: "خوراکی",
                duration: None,
                instructions: Some("در یک لیتر آب جوشیده سرد حل شود"),
            },
            MedicineTemplate {
                name: "Zinc Sulfate",
                dosage: "20mg",
                frequency: "روزانه یک بار",
                route: "خوراکی",
                duration: Some("۱۰ روز"),
                instructions: None,
            },
            METOCLOPRAMIDE,
        ],
        advice: &["نوشیدن مایعات فراوان برای جلوگیری از کم‌آبی بدن"],
    },
    Condition {
        name: "گاستریت",
        name_en: "Gastritis",
        icd_code: "K29",
        keywords: &[
            "سوزش معده",
            "درد معده",
            "ترش کردن",
            "نفخ",
            "درد شکم",
            "heartburn",
            "epigastric pain",
            "dyspepsia",
            "bloating",
            "abdominal pain",
        ],
        medicines: &[
            MedicineTemplate {
                name: "Omeprazole",
                dosage: "20mg",
                frequency: "روزانه یک بار",
                route: "خوراکی",
                duration: Some("۱۴ روز"),
                instructions: Some("نیم ساعت قبل از صبحانه"),
            },
            MedicineTemplate {
                name: "Antacid Suspension",
                dosage: "10ml",
                frequency: "هر ۸ ساعت",
                route: "خوراکی",
                duration: Some("۷ روز"),
                instructions: Some("یک ساعت بعد از غذا"),
            },
        ],
        advice: &["از غذاهای تند، چرب و چای زیاد پرهیز شود"],
    },
    Condition {
        name: "فشار خون بلند",
        name_en: "Hypertension",
        icd_code: "I10",
        keywords: &[
            "فشار خون",
            "فشار بلند",
            "فشار بالا",
            "سرگیجه",
            "hypertension",
            "high blood pressure",
            "dizziness",
        ],
        medicines: &[MedicineTemplate {
            name: "Amlodipine",
            dosage: "5mg",
            frequency: "روزانه یک بار",
            route: "خوراکی",
            duration: None,
            instructions: Some("هر روز در یک وقت معین"),
        }],
        advice: &["کاهش مصرف نمک و اندازه‌گیری منظم فشار خون"],
    },
    Condition {
        name: "دیابت نوع دوم",
        name_en: "Type 2 diabetes mellitus",
        icd_code: "E11",
        keywords: &[
            "دیابت",
            "شکر",
            "قند خون",
            "تشنگی زیاد",
            "پرادراری",
            "diabetes",
            "high blood sugar",
            "polyuria",
            "excessive thirst",
        ],
        medicines: &[MedicineTemplate {
            name: "Metformin",
            dosage: "500mg",
            frequency: "روزانه دو بار",
            route: "خوراکی",
            duration: None,
            instructions: Some("همراه با غذا"),
        }],
        advice: &["رژیم غذایی کم‌شکر و ورزش منظم"],
    },
    Condition {
        name: "عفونت مجاری ادرار",
        name_en: "Urinary tract infection",
        icd_code: "N39.0",
        keywords: &[
            "سوزش ادرار",
            "تکرر ادرار",
            "درد هنگام ادرار",
            "dysuria",
            "burning urination",
            "frequent urination",
            "uti",
        ],
        medicines: &[MedicineTemplate {
            name: "Ciprofloxacin",
            dosage: "500mg",
            frequency: "روزانه دو بار",
            route: "خوراکی",
            duration: Some("۵ روز"),
            instructions: Some("با یک گیلاس آب کامل"),
        }],
        advice: &["نوشیدن آب فراوان"],
    },
    Condition {
        name: "کم‌خونی فقر آهن",
        name_en: "Iron deficiency anaemia",
        icd_code: "D50",
        keywords: &[
            "کم خونی",
            "رنگ پریدگی",
            "ضعف",
            "anemia",
            "anaemia",
            "pallor",
            "weakness",
            "fatigue",
        ],
        medicines: &[
            MedicineTemplate {
                name: "Ferrous Sulfate",
                dosage: "325mg",
                frequency: "روزانه یک بار",
                route: "خوراکی",
                duration: Some("۳ ماه"),
                instructions: Some("با شکم خالی یا همراه آب میوه"),
            },
            MedicineTemplate {
                name: "Folic Acid",
                dosage: "5mg",
                frequency: "روزانه یک بار",
                route: "خوراکی",
                duration: Some("۳ ماه"),
                instructions: None,
            },
        ],
        advice: &["مصرف غذاهای غنی از آهن مانند گوشت سرخ و سبزیجات سبز"],
    },
];

/// Diagnoses offered by autocomplete in addition to the dictionary conditions.
pub const EXTRA_DIAGNOSES: &[&str] = &[
    "سینه‌بغل (نمونیا)",
    "Pneumonia",
    "التهاب گوش میانه",
    "Otitis media",
    "التهاب سینوس",
    "Sinusitis",
    "ملاریا",
    "Malaria",
    "تیفوئید",
    "Typhoid fever",
    "درد کمر",
    "Low back pain",
    "التهاب مفاصل",
    "Osteoarthritis",
];

/// Medicines offered by autocomplete in addition to those in the dictionary.
pub const EXTRA_MEDICINES: &[&str] = &[
    "Azithromycin",
    "Cefixime",
    "Ceftriaxone",
    "Co-trimoxazole",
    "Diclofenac",
    "Doxycycline",
    "Losartan",
    "Metronidazole",
    "Multivitamin",
    "Prednisolone",
    "Ranitidine",
    "Vitamin D3",
];

pub const FREQUENCIES: &[&str] = &[
    "روزانه یک بار",
    "روزانه دو بار",
    "روزانه سه بار",
    "هر ۶ ساعت",
    "هر ۸ ساعت",
    "هر ۱۲ ساعت",
    "شب قبل از خواب",
    "در صورت ضرورت",
    "Once daily",
    "Twice daily",
    "Three times daily",
    "Every 8 hours",
    "As needed",
];

pub const ROUTES: &[&str] = &[
    "خوراکی",
    "تزریق وریدی",
    "تزریق عضلی",
    "موضعی",
    "استنشاقی",
    "قطره چشم",
    "بینی",
    "Oral",
    "IV",
    "IM",
    "Topical",
    "Inhalation",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_condition_has_keywords_and_medicines() {
        for condition in CONDITIONS {
            assert!(!condition.keywords.is_empty(), "{}", condition.name_en);
            assert!(!condition.medicines.is_empty(), "{}", condition.name_en);
            assert!(!condition.icd_code.is_empty(), "{}", condition.name_en);
        }
    }

    #[test]
    fn condition_names_are_unique() {
        let names: HashSet<_> = CONDITIONS.iter().map(|c| c.name).collect();
        assert_eq!(names.len(), CONDITIONS.len());
    }

    #[test]
    fn template_converts_to_suggestion() {
        let s = PARACETAMOL.to_suggestion();
        assert_eq!(s.name, "Paracetamol");
        assert_eq!(s.route, "خوراکی");
        assert!(s.duration.is_some());
    }
}
