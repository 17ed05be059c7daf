//! Localised (Dari) messages returned to API clients.
//!
//! Handlers never expose internal error text; they return one of these generic messages and
//! log the underlying error instead.

pub const INTERNAL_ERROR: &str = "خطای داخلی سرور رخ داد. لطفاً دوباره تلاش کنید.";

pub const REQUIRED_FIELDS: &str = "نام مریض و تشخیص الزامی است.";

pub const INVALID_INPUT: &str = "معلومات واردشده نامعتبر است.";

pub const INVALID_ID: &str = "شناسه نامعتبر است.";

pub const PRESCRIPTION_NOT_FOUND: &str = "نسخه مورد نظر یافت نشد.";

pub const PRESET_NOT_FOUND: &str = "قالب مورد نظر یافت نشد.";

pub const PRESET_NAME_REQUIRED: &str = "نام قالب الزامی است.";

pub const SYMPTOMS_REQUIRED: &str = "لطفاً علایم مریض را وارد کنید.";

pub const DIAGNOSIS_REQUIRED: &str = "لطفاً تشخیص را وارد کنید.";

pub const PDF_FAILED: &str = "ایجاد فایل PDF ناموفق بود.";
