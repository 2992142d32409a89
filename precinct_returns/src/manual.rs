/*!

This is the long-form manual for `precinct_returns` and `prconvert`.

## Input files

The input is a directory with one file per county, named
`<year>-<General|Primary>-<County>.<csv|xlsx|xls>`, for example `2016-General-Autauga.xlsx`.
Files with other names are read as spreadsheets, and the county is the part of the name
before the first dot. Hidden files, directories and files without an extension are skipped.

The year is only used to apply the row exclusions. It is taken from the `--year` option,
then from the file name, then from the name of the input directory when it is a 4-digit number.

## Layouts

The layout of a spreadsheet is detected from the first cell of its first sheet, after the
blank rows have been removed and the text has been trimmed.
CSV files always use the flat record layout.

Blank vote cells do not mean the same thing in every layout: in some layouts they mean that
the candidate was not on the ballot in this precinct (the observation is dropped), in others
they mean zero votes.

### Contest title column

The first cell is `Contest Title`. Each row is a (contest, party, candidate) and every other
column is a precinct:

| Contest Title | Party | Candidate | Precinct A | Precinct B |
|---------------|-------|-----------|------------|------------|
| President     | R     | Smith     | 10         | 20         |
| President     | D     | Jones (D) | 15         |            |

The party and candidate columns may also be called `Party Code` and `Candidate Name`.
Blank vote cells are dropped.

### Blank header, transposed

The first cell is blank or is the name of a valid office. The first row holds the offices,
written once above their first candidate; the second row holds the candidates. Every
following row is a precinct:

|          | GOVERNOR  |           | US Rep Dist 2 |
|----------|-----------|-----------|---------------|
| Precinct | Smith (R) | Jones (D) | Doe (R)       |
| Hall A   | 10        |           | 4             |

A precinct named `REPORTED TOTALS` becomes the `Total` precinct and `CALCULATED TOTALS` is
dropped. Blank vote cells count as zero votes.

### Table of contents

The first cell is `Table of Contents`. The first sheet is a directory of
(sheet name, contest description) entries, and only the entries starting with one of the
table of contents prefixes are read. The office comes from the description, without its
leading `FOR` and its `(Vote For N)` suffix.

Each contest sheet has a title row, then a row with the candidates, then one row per
precinct. Only every other column holds votes, and the last column is a total which is
ignored. The last row is the `Total` precinct. Blank vote cells count as zero votes.

### Flat records

CSV exports with one observation per line and the columns
`county, election_date, contest_number, candidate_number, votes, party, contest_title,
candidate, precinct, district_name`. The contests numbered below 100 (registered voters,
ballots cast) are dropped, as well as blank vote cells.

## Districts, parties and offices

Districts are extracted from the contests: `STATE SENATOR, DISTRICT 7` and `US Rep Dist 2`
respectively give the district 7 of `STATE SENATOR` and the district 2 of `US Rep`.
Parties in parentheses are removed from the candidate names: `Jones (D)` is the candidate
`Jones` of the party `D`, unless the file has a party column.

The offices are title-cased and mapped to a controlled vocabulary. The observations of an
office outside of the valid offices are dropped.

## Configuration

`prconvert` comes with the built-in tables for the statewide general elections. A JSON
configuration file may be passed with `--config`:

```text
{
  "officeAliases": {"Probate Judge": "Probate Judge"},
  "candidateAliases": {"WRITE-IN": "Write-ins"},
  "validOffices": ["Probate Judge"],
  "tocOfficePrefixes": ["FOR PROBATE JUDGE"],
  "rowExclusions": [{"county": "Clay", "year": 2014, "rows": [21, 22, 23]}],
  "replaceDefaults": false
}
```

All the fields are optional. The tables extend the built-in ones, unless `replaceDefaults`
is true. The office aliases apply to the raw office first, then to the title-cased office.

The row exclusions drop specific rows of a county file in the blank header layout. The rows
are counted from 0 once the blank rows have been removed. The exclusion of the rows 21 to 23
of the 2014 file of Clay county is built in.

## Output

A CSV file with the header `county,precinct,office,district,party,candidate,votes`,
sorted in this order. The district is empty when the office has none.

 */
