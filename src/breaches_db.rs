// Built in breach catalog, sampled by the simulated breach source
pub static BREACHES: &str = r#"[
  {
    "name": "SocialConnect2021",
    "domain": "socialconnect.com",
    "breachDate": "2021-05-15",
    "addedDate": "2021-06-01",
    "pwnCount": 150000000,
    "dataClasses": ["Email addresses", "Usernames", "Passwords", "Phone numbers"],
    "description": "In mid-2021, SocialConnect suffered a major data breach exposing user profile information and credentials."
  },
  {
    "name": "EshopMarket",
    "domain": "eshop-market.com",
    "breachDate": "2022-11-20",
    "addedDate": "2022-12-10",
    "pwnCount": 75000000,
    "dataClasses": ["Email addresses", "Passwords", "Physical addresses", "Financial information"],
    "description": "Customer data from EshopMarket was compromised, including payment details and shipping addresses."
  },
  {
    "name": "MyHealthTracker",
    "domain": "my-health-tracker.io",
    "breachDate": "2023-01-30",
    "addedDate": "2023-02-18",
    "pwnCount": 2500000,
    "dataClasses": ["Email addresses", "Passwords", "Health data"],
    "description": "A breach at MyHealthTracker exposed sensitive personal health information."
  },
  {
    "name": "GamingForumXYZ",
    "domain": "gamingforum.xyz",
    "breachDate": "2020-08-01",
    "addedDate": "2020-08-25",
    "pwnCount": 50000000,
    "dataClasses": ["Email addresses", "Usernames", "IP addresses", "Passwords"],
    "description": "The popular gaming forum was hacked, leading to the leak of user credentials and IP addresses."
  },
  {
    "name": "GovRecordsLeak",
    "domain": "regional-gov-records.gov",
    "breachDate": "2023-04-10",
    "addedDate": "2023-05-02",
    "pwnCount": 1200000,
    "dataClasses": ["Email addresses", "National ID numbers", "Physical addresses"],
    "description": "A government database was inadvertently exposed, leaking national identification numbers and personal details."
  }
]"#;
