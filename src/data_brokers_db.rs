// Built in data broker catalog
pub static DATA_BROKERS: &str = r##"[
  {
    "name": "Acxiom",
    "description": "One of the largest data brokers, collecting consumer data and analytics.",
    "removalLink": "#",
    "difficulty": "Hard"
  },
  {
    "name": "Spokeo",
    "description": "A people search engine that aggregates data from online and offline sources.",
    "removalLink": "#",
    "difficulty": "Medium"
  },
  {
    "name": "Whitepages",
    "description": "Provides contact information and background checks on individuals.",
    "removalLink": "#",
    "difficulty": "Medium"
  },
  {
    "name": "Intelius",
    "description": "Offers background checks, criminal records, and other personal information.",
    "removalLink": "#",
    "difficulty": "Hard"
  },
  {
    "name": "BeenVerified",
    "description": "A background check company that allows searching for people, vehicles, and contact information.",
    "removalLink": "#",
    "difficulty": "Easy"
  }
]"##;
